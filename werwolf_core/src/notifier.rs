/// Shows a message to the person holding the device, e.g. a modal dialog.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}
