use chrono::{DateTime, Utc};

use crate::codec::RawValue;

/// The decoded payload of a REC packet, shaped by the referenced track's
/// `rec_type`.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum RecValues {
    /// Waveform: `num` samples, possibly zero.
    Wav(Vec<RawValue>),
    /// Numeric: exactly one sample.
    Num(RawValue),
    /// String/annotation: exactly one string.
    Str(String),
}

impl RecValues {
    /// Number of logical values carried by this block (always 1 for
    /// Num/Str).
    pub fn len(&self) -> usize {
        match self {
            RecValues::Wav(v) => v.len(),
            RecValues::Num(_) | RecValues::Str(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single decoded REC packet.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Rec {
    pub dt: DateTime<Utc>,
    pub trkid: u16,
    pub values: RecValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recvalues_len() {
        assert_eq!(RecValues::Num(RawValue::F32(1.0)).len(), 1);
        assert_eq!(RecValues::Str("x".into()).len(), 1);
        assert_eq!(RecValues::Wav(vec![]).len(), 0);
        assert!(RecValues::Wav(vec![]).is_empty());
        assert_eq!(
            RecValues::Wav(vec![RawValue::U8(1), RawValue::U8(2)]).len(),
            2
        );
    }
}
