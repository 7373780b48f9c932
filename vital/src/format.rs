/// `rec_type` from a TRKINFO packet: the shape of values carried by a track's RECs.
///
/// TRKINFO stores this as a raw byte rather than this enum (see
/// [`crate::track::TrackInfo::rec_type`]) because an out-of-range value is
/// only an error once a REC actually tries to use it — a track that is
/// declared but never referenced by a REC should not fail the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum RecType {
    /// Waveform: a variable-length block of samples per REC.
    Wav,
    /// Numeric: exactly one sample per REC.
    Num,
    /// String/annotation: exactly one string per REC. `srate` is always 0.
    Str,
}

impl RecType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(RecType::Wav),
            2 => Some(RecType::Num),
            5 => Some(RecType::Str),
            _ => None,
        }
    }
}

/// `recfmt` from a TRKINFO packet: the element type of a track's raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum RecFmt {
    F32,
    F64,
    /// recfmt 3: nominally "char", unused in practice.
    U8,
    /// recfmt 4.
    U8Alt,
    I16,
    U16,
    I32,
    U32,
}

impl RecFmt {
    /// Like [`RecType::from_byte`], this is intentionally fallible rather
    /// than validated at TRKINFO-parse time: a track whose `recfmt` is never
    /// exercised by a REC should not fail the parse.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(RecFmt::F32),
            2 => Some(RecFmt::F64),
            3 => Some(RecFmt::U8),
            4 => Some(RecFmt::U8Alt),
            5 => Some(RecFmt::I16),
            6 => Some(RecFmt::U16),
            7 => Some(RecFmt::I32),
            8 => Some(RecFmt::U32),
            _ => None,
        }
    }

    /// Byte width of a single element in this format.
    pub fn width(self) -> usize {
        match self {
            RecFmt::F32 => 4,
            RecFmt::F64 => 8,
            RecFmt::U8 | RecFmt::U8Alt => 1,
            RecFmt::I16 | RecFmt::U16 => 2,
            RecFmt::I32 | RecFmt::U32 => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rec_type_from_byte() {
        assert_eq!(RecType::from_byte(1), Some(RecType::Wav));
        assert_eq!(RecType::from_byte(2), Some(RecType::Num));
        assert_eq!(RecType::from_byte(5), Some(RecType::Str));
        assert_eq!(RecType::from_byte(3), None);
    }

    #[test]
    fn test_recfmt_widths() {
        assert_eq!(RecFmt::from_byte(1).unwrap().width(), 4);
        assert_eq!(RecFmt::from_byte(2).unwrap().width(), 8);
        assert_eq!(RecFmt::from_byte(3).unwrap().width(), 1);
        assert_eq!(RecFmt::from_byte(4).unwrap().width(), 1);
        assert_eq!(RecFmt::from_byte(5).unwrap().width(), 2);
        assert_eq!(RecFmt::from_byte(6).unwrap().width(), 2);
        assert_eq!(RecFmt::from_byte(7).unwrap().width(), 4);
        assert_eq!(RecFmt::from_byte(8).unwrap().width(), 4);
    }

    #[test]
    fn test_recfmt_unknown() {
        assert!(RecFmt::from_byte(9).is_none());
    }
}
