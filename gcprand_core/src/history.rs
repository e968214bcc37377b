//! Append-only, time-ordered store of observations.

use crate::classify::ColorLabel;
use crate::error::{GcpError, Result};
use crate::observation::Observation;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::io::Write;

/// Observations in acquisition order. Only grows.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<Observation>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation. Timestamps must not go backwards.
    pub fn append(&mut self, obs: Observation) {
        debug_assert!(
            self.entries
                .last()
                .is_none_or(|prev| prev.timestamp() <= obs.timestamp()),
            "history timestamps must be non-decreasing"
        );
        self.entries.push(obs);
    }

    pub fn latest(&self) -> Result<&Observation> {
        self.entries.last().ok_or(GcpError::EmptyHistory)
    }

    /// Uniformly chosen entry, selected with the operating system CSPRNG.
    pub fn random_entry(&self) -> Result<&Observation> {
        self.entries.choose(&mut OsRng).ok_or(GcpError::EmptyHistory)
    }

    pub fn all(&self) -> &[Observation] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn shifted_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(Observation::shifted_value)
    }

    /// Number of observations per color band (bands with no entries omitted).
    pub fn label_counts(&self) -> BTreeMap<ColorLabel, usize> {
        let mut counts = BTreeMap::new();
        for obs in &self.entries {
            *counts.entry(obs.color()).or_insert(0) += 1;
        }
        counts
    }

    /// Shannon entropy (natural log) of the color-band distribution.
    /// `None` for an empty history.
    pub fn label_entropy(&self) -> Option<f64> {
        let n = self.entries.len();
        if n == 0 {
            return None;
        }
        let n = n as f64;
        let h = self
            .label_counts()
            .values()
            .map(|&c| {
                let p = c as f64 / n;
                -p * p.ln()
            })
            .sum::<f64>();
        Some(h.max(0.0))
    }

    /// Write every shifted value, one plain number per line, then flush.
    pub fn write_shifted<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        for v in self.shifted_values() {
            writeln!(out, "{v}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Export as CSV with header `raw_position,index,timestamp,color,shifted_value`.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(out);
        if self.entries.is_empty() {
            wtr.write_record(["raw_position", "index", "timestamp", "color", "shifted_value"])?;
        }
        for obs in &self.entries {
            wtr.serialize(obs)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcprand_traits::RawReading;

    fn obs(position: f64, ts: f64) -> Observation {
        Observation::from_reading(RawReading::new(position, 100.0), ts).unwrap()
    }

    #[test]
    fn empty_history_reads_fail() {
        let h = History::new();
        assert_eq!(h.latest(), Err(GcpError::EmptyHistory));
        assert_eq!(h.random_entry(), Err(GcpError::EmptyHistory));
        assert_eq!(h.label_entropy(), None);
        assert_eq!(h.count(), 0);
    }

    #[test]
    fn latest_is_last_appended() {
        let mut h = History::new();
        h.append(obs(10.0, 1.0));
        h.append(obs(20.0, 2.0));
        assert_eq!(h.latest().unwrap().raw_position(), 20.0);
        assert_eq!(h.count(), 2);
    }

    #[test]
    fn random_entry_is_a_member() {
        let mut h = History::new();
        for i in 0..10 {
            h.append(obs(f64::from(i) * 10.0, f64::from(i)));
        }
        for _ in 0..50 {
            let picked = h.random_entry().unwrap();
            assert!(h.all().contains(picked));
        }
    }

    #[test]
    fn entropy_of_bands() {
        let mut h = History::new();
        h.append(obs(50.0, 1.0));
        h.append(obs(60.0, 2.0));
        assert_eq!(h.label_entropy(), Some(0.0));

        // {green: 2, yellow: 2}
        let mut h2 = History::new();
        h2.append(obs(50.0, 1.0));
        h2.append(obs(20.0, 2.0));
        h2.append(obs(60.0, 3.0));
        h2.append(obs(30.0, 4.0));
        let e = h2.label_entropy().unwrap();
        assert!((e - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn shifted_lines() {
        let mut h = History::new();
        h.append(obs(10.0, 1.0));
        h.append(obs(5.0, 2.0));
        let mut out = Vec::new();
        h.write_shifted(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.1\n0.5\n");
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let mut h = History::new();
        h.append(obs(45.0, 1.5));
        let mut out = Vec::new();
        h.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("raw_position,index,timestamp,color,shifted_value")
        );
        assert_eq!(lines.next(), Some("45.0,0.45,1.5,green,0.5"));
    }
}
