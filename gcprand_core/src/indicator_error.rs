//! Maps `Box<dyn Error>` from the `Indicator` boundary to typed `GcpError`.
//!
//! The traits in `gcprand_traits` use `Box<dyn Error + Send + Sync>` so any
//! reading source can plug in; this module turns those into our error enum,
//! with an optional feature-gated path for `gcprand_devices::DeviceError`.

use crate::error::GcpError;

/// Map an indicator failure to a typed `GcpError`.
///
/// Known device error types are downcast first, then the message is inspected.
/// The original message is kept verbatim in `GcpError::Acquisition`.
pub fn map_indicator_error(e: &(dyn std::error::Error + Send + Sync + 'static)) -> GcpError {
    #[cfg(feature = "device-errors")]
    {
        if let Some(dev) = e.downcast_ref::<gcprand_devices::error::DeviceError>() {
            return match dev {
                gcprand_devices::error::DeviceError::Timeout => GcpError::Timeout,
                other => GcpError::Acquisition(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") || s.to_lowercase().contains("timed out") {
        GcpError::Timeout
    } else {
        GcpError::Acquisition(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_messages_become_timeout() {
        let e: Box<dyn std::error::Error + Send + Sync> = "render timed out".into();
        assert_eq!(map_indicator_error(e.as_ref()), GcpError::Timeout);
    }

    #[test]
    fn other_messages_are_preserved() {
        let e: Box<dyn std::error::Error + Send + Sync> = "page layout changed".into();
        assert_eq!(
            map_indicator_error(e.as_ref()),
            GcpError::Acquisition("page layout changed".into())
        );
    }

    #[cfg(feature = "device-errors")]
    #[test]
    fn device_timeout_is_downcast() {
        let e: Box<dyn std::error::Error + Send + Sync> =
            Box::new(gcprand_devices::error::DeviceError::Timeout);
        assert_eq!(map_indicator_error(e.as_ref()), GcpError::Timeout);
    }
}
