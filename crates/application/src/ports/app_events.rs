//! App-event logging port

/// Stateless pass-through calls into the provider's event logger and
/// data-collection flags.
pub trait AppEvents: Send + Sync {
    /// Records a named app event.
    fn log_event(&self, name: &str);

    /// Toggles automatic app-event logging.
    fn set_auto_log_app_events_enabled(&self, enabled: bool);

    /// Toggles advertiser-id collection.
    fn set_advertiser_id_collection_enabled(&self, enabled: bool);
}
