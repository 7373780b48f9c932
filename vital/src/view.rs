//! A single track's metadata joined with its RECs, with the ADC affine
//! transform applied.

use chrono::{DateTime, Utc};

use crate::codec::RawValue;
use crate::frame::{Rec, RecValues};
use crate::track::TrackInfo;

/// One track's RECs, in file order, with raw samples converted to their
/// real-world units via `real = raw * adc_gain + adc_offset`.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum RealValues {
    Wav(Vec<f64>),
    Num(f64),
    /// Annotation tracks carry no ADC transform; the string passes through
    /// unchanged.
    Str(String),
}

/// A single timestamped block within a [`TrackView`], after the ADC
/// transform.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct RealBlock {
    pub dt: DateTime<Utc>,
    pub values: RealValues,
}

/// A track joined with every REC that references it, in file order.
pub struct TrackView<'a> {
    pub info: &'a TrackInfo,
    pub blocks: Vec<RealBlock>,
}

impl<'a> TrackView<'a> {
    pub(crate) fn new(info: &'a TrackInfo, recs: Vec<&Rec>) -> Self {
        let blocks = recs
            .into_iter()
            .map(|rec| RealBlock {
                dt: rec.dt,
                values: apply_adc(rec, info),
            })
            .collect();
        TrackView { info, blocks }
    }

    /// Sampling period in milliseconds; `None` for annotation tracks.
    pub fn sample_period_ms(&self) -> Option<f64> {
        self.info.sample_period_ms()
    }

    /// Total number of logical samples across every block.
    pub fn sample_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| match &b.values {
                RealValues::Wav(v) => v.len(),
                RealValues::Num(_) | RealValues::Str(_) => 1,
            })
            .sum()
    }
}

fn apply_adc(rec: &Rec, info: &TrackInfo) -> RealValues {
    match &rec.values {
        RecValues::Wav(raw) => RealValues::Wav(
            raw.iter()
                .map(|v| v.as_f64() * info.adc_gain + info.adc_offset)
                .collect(),
        ),
        RecValues::Num(raw) => RealValues::Num(raw.as_f64() * info.adc_gain + info.adc_offset),
        RecValues::Str(s) => RealValues::Str(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn track(rec_type: u8, adc_gain: f64, adc_offset: f64) -> TrackInfo {
        TrackInfo {
            trkid: 1,
            rec_type,
            recfmt: 1,
            name: "HR".into(),
            unit: "bpm".into(),
            minval: 0.0,
            maxval: 300.0,
            color: [0, 0, 0, 0],
            srate: 0.0,
            adc_gain,
            adc_offset,
            montype: 0,
            devid: 0,
        }
    }

    fn num_rec(v: f32) -> Rec {
        Rec {
            dt: Utc.timestamp_opt(0, 0).unwrap(),
            trkid: 1,
            values: RecValues::Num(RawValue::F32(v)),
        }
    }

    #[test]
    fn test_adc_transform_num() {
        let info = track(2, 2.0, 10.0);
        let rec = num_rec(5.0);
        let view = TrackView::new(&info, vec![&rec]);
        match &view.blocks[0].values {
            RealValues::Num(v) => assert_eq!(*v, 20.0),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_adc_transform_wav() {
        let info = track(1, 2.0, 1.0);
        let rec = Rec {
            dt: Utc.timestamp_opt(0, 0).unwrap(),
            trkid: 1,
            values: RecValues::Wav(vec![RawValue::U16(1), RawValue::U16(2)]),
        };
        let view = TrackView::new(&info, vec![&rec]);
        match &view.blocks[0].values {
            RealValues::Wav(v) => assert_eq!(v, &vec![3.0, 5.0]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_str_passthrough_no_adc() {
        let info = track(5, 99.0, 99.0);
        let rec = Rec {
            dt: Utc.timestamp_opt(0, 0).unwrap(),
            trkid: 1,
            values: RecValues::Str("alarm".into()),
        };
        let view = TrackView::new(&info, vec![&rec]);
        match &view.blocks[0].values {
            RealValues::Str(s) => assert_eq!(s, "alarm"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_sample_count_sums_wav_blocks() {
        let info = track(1, 1.0, 0.0);
        let rec1 = Rec {
            dt: Utc.timestamp_opt(0, 0).unwrap(),
            trkid: 1,
            values: RecValues::Wav(vec![RawValue::U8(1), RawValue::U8(2), RawValue::U8(3)]),
        };
        let rec2 = Rec {
            dt: Utc.timestamp_opt(1, 0).unwrap(),
            trkid: 1,
            values: RecValues::Wav(vec![RawValue::U8(4)]),
        };
        let view = TrackView::new(&info, vec![&rec1, &rec2]);
        assert_eq!(view.sample_count(), 4);
    }
}
