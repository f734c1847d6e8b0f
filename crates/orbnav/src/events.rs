/// Events produced off the GTK main loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigReload,
}
