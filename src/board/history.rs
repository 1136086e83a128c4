/// One entry per position reached in play, in game order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub ply: u32,
    pub fingerprint: u64,
}

/// Append-only log of the fingerprints a game has gone through.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn record(&mut self, fingerprint: u64) {
        let ply = self.entries.len() as u32;
        self.entries.push(HistoryEntry { ply, fingerprint });
    }

    pub fn entries(&self) -> &[HistoryEntry] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn last(&self) -> Option<&HistoryEntry> { self.entries.last() }

    /// How often the latest position occurred with the same side to move.
    /// Fingerprints carry no side to move, so only plies of equal parity count.
    pub fn repetitions(&self) -> usize {
        let Some(last) = self.last() else { return 0 };
        self.entries
            .iter()
            .filter(|e| e.fingerprint == last.fingerprint && (last.ply - e.ply) % 2 == 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repetitions_ignore_the_other_side_to_move() {
        let mut h = History::default();
        for fp in [1, 2, 1, 2, 1] {
            h.record(fp);
        }
        assert_eq!(h.repetitions(), 3);
        h.record(1);
        // ply 5 has odd parity; only plies 1 and 3 would match and they hold 2
        assert_eq!(h.repetitions(), 1);
        assert_eq!(h.len(), 6);
    }

    #[test]
    fn empty_history_has_no_repetitions() {
        assert_eq!(History::default().repetitions(), 0);
    }
}
