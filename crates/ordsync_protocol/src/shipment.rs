//! Source markers and the shipment external-id codec.
//!
//! Records created on the warehouse carry a marker tying them back to the
//! storefront record they came from. The marker doubles as the idempotency
//! token for webhook re-processing: once tracking numbers have been
//! communicated for a shipment, its external id gains a `:t` suffix and
//! later deliveries of the same event are skipped.

/// Prefix identifying records that originate from our storefront.
pub const SOURCE_PREFIX: &str = "storefront";

/// A parsed warehouse-shipment external id.
///
/// Encoded as `storefront:<shipment_id>` before tracking numbers have been
/// communicated and `storefront:<shipment_id>:t` after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentExternalId {
    /// The storefront shipment increment id.
    pub shipment_id: String,
    /// Whether tracking numbers have already been communicated.
    pub tracking_added: bool,
}

impl ShipmentExternalId {
    /// Creates an external id for the given storefront shipment.
    pub fn new(shipment_id: impl Into<String>, tracking_added: bool) -> Self {
        Self {
            shipment_id: shipment_id.into(),
            tracking_added,
        }
    }

    /// Encodes to the wire form.
    pub fn encode(&self) -> String {
        if self.tracking_added {
            format!("{}:{}:t", SOURCE_PREFIX, self.shipment_id)
        } else {
            format!("{}:{}", SOURCE_PREFIX, self.shipment_id)
        }
    }

    /// Parses the wire form. Returns `None` for ids that do not carry our
    /// source prefix (they belong to some other integration).
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix(SOURCE_PREFIX)?.strip_prefix(':')?;
        let (shipment_id, tracking_added) = match rest.strip_suffix(":t") {
            Some(id) => (id, true),
            None => (rest, false),
        };
        if shipment_id.is_empty() || shipment_id.contains(':') {
            return None;
        }
        Some(Self::new(shipment_id, tracking_added))
    }

    /// Returns a copy marked as having had tracking numbers communicated.
    pub fn with_tracking_added(&self) -> Self {
        Self::new(self.shipment_id.clone(), true)
    }
}

/// Builds the source marker recorded on warehouse orders created from a
/// storefront order: `storefront:<increment_id>`.
pub fn order_source(increment_id: &str) -> String {
    format!("{}:{}", SOURCE_PREFIX, increment_id)
}

/// Extracts the storefront order increment id from a source marker.
///
/// Returns `None` when the marker belongs to another integration; such
/// events are not ours to handle.
pub fn parse_order_source(source: &str) -> Option<&str> {
    let id = source.strip_prefix(SOURCE_PREFIX)?.strip_prefix(':')?;
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_id_roundtrip() {
        for tracking in [false, true] {
            let id = ShipmentExternalId::new("100000055", tracking);
            let parsed = ShipmentExternalId::parse(&id.encode()).unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn external_id_encodings() {
        assert_eq!(
            ShipmentExternalId::new("7", false).encode(),
            "storefront:7"
        );
        assert_eq!(
            ShipmentExternalId::new("7", true).encode(),
            "storefront:7:t"
        );
    }

    #[test]
    fn foreign_ids_do_not_parse() {
        assert!(ShipmentExternalId::parse("shopify:123").is_none());
        assert!(ShipmentExternalId::parse("storefront:").is_none());
        assert!(ShipmentExternalId::parse("storefront:a:b:t").is_none());
        assert!(ShipmentExternalId::parse("123").is_none());
    }

    #[test]
    fn tracking_flag_upgrade() {
        let id = ShipmentExternalId::new("42", false);
        assert_eq!(id.with_tracking_added().encode(), "storefront:42:t");
    }

    #[test]
    fn order_source_roundtrip() {
        let source = order_source("100000123");
        assert_eq!(source, "storefront:100000123");
        assert_eq!(parse_order_source(&source), Some("100000123"));
    }

    #[test]
    fn foreign_order_sources_are_rejected() {
        assert_eq!(parse_order_source("shopify:100000123"), None);
        assert_eq!(parse_order_source("storefront:abc"), None);
        assert_eq!(parse_order_source("storefront:"), None);
    }
}
