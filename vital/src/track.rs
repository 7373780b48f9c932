use std::collections::HashMap;

/// Metadata and decoding format for a single track, decoded from a TRKINFO
/// packet.
///
/// `rec_type` and `recfmt` are kept as raw bytes rather than
/// [`crate::format::RecType`]/[`crate::format::RecFmt`]: an out-of-range
/// value only matters once a REC actually tries to use it (see
/// [`crate::format::RecType::from_byte`]), so validation is deferred to REC
/// decode time rather than rejecting the TRKINFO itself.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct TrackInfo {
    pub trkid: u16,
    pub rec_type: u8,
    pub recfmt: u8,
    pub name: String,
    pub unit: String,
    pub minval: f32,
    pub maxval: f32,
    pub color: [u8; 4],
    pub srate: f32,
    pub adc_gain: f64,
    pub adc_offset: f64,
    pub montype: u8,
    pub devid: u32,
}

impl TrackInfo {
    /// Sampling period in milliseconds, or `None` for annotation tracks
    /// (`srate == 0`) to avoid the division-by-zero the reference
    /// Python implementation catches after the fact.
    pub fn sample_period_ms(&self) -> Option<f64> {
        if self.srate == 0.0 {
            None
        } else {
            Some(1000.0 / self.srate as f64)
        }
    }
}

/// Device metadata decoded from a DEVINFO packet.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct DevInfo {
    pub devid: u32,
    pub typename: String,
    pub devname: String,
    pub port: String,
}

/// A control command decoded from a CMD packet.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Cmd {
    /// cmd=5: fixed track display order.
    Order { trkids: Vec<u16> },
    /// cmd=6: clear recorded annotation events.
    ResetEvents,
    /// Any other cmd byte; carries no further parsed fields.
    Other { cmd: u8 },
}

/// Accumulates TRKINFO packets into a `trkid -> TrackInfo` lookup table.
///
/// Scoped to a single parse invocation — never process-wide or `static`.
/// Duplicate `trkid`s overwrite silently: later TRKINFOs win for REC decoding,
/// but callers retain every TRKINFO they observed for the exposed track-info
/// list (EVENT dedup happens one level up, in [`crate::reader::VitalFile`]).
#[derive(Debug, Default)]
pub struct TrackRegistry {
    by_id: HashMap<u16, TrackInfo>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: TrackInfo) {
        self.by_id.insert(info.trkid, info);
    }

    pub fn get(&self, trkid: u16) -> Option<&TrackInfo> {
        self.by_id.get(&trkid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track(trkid: u16, srate: f32) -> TrackInfo {
        TrackInfo {
            trkid,
            rec_type: 2,
            recfmt: 1,
            name: "HR".into(),
            unit: "bpm".into(),
            minval: 0.0,
            maxval: 300.0,
            color: [0, 0, 0, 0],
            srate,
            adc_gain: 1.0,
            adc_offset: 0.0,
            montype: 0,
            devid: 7,
        }
    }

    #[test]
    fn test_registry_last_trkid_wins() {
        let mut reg = TrackRegistry::new();
        reg.insert(sample_track(1, 1.0));
        let mut second = sample_track(1, 1.0);
        second.name = "HR2".into();
        reg.insert(second);
        assert_eq!(reg.get(1).unwrap().name, "HR2");
    }

    #[test]
    fn test_registry_unknown_trkid() {
        let reg = TrackRegistry::new();
        assert!(reg.get(99).is_none());
    }

    #[test]
    fn test_sample_period_ms() {
        assert_eq!(sample_track(1, 2.0).sample_period_ms(), Some(500.0));
        assert_eq!(sample_track(1, 0.0).sample_period_ms(), None);
    }
}
