use super::parse::{LyricCue, ParsedLyrics};

/// Index of the last cue starting at or before `position`, or `None` when
/// `position` precedes the first cue. `cues` must be sorted by time.
pub fn active_cue(position: f64, cues: &[LyricCue]) -> Option<usize> {
    cues.partition_point(|c| c.time <= position).checked_sub(1)
}

/// First visible line so that `active` sits in the middle of a `viewport`
/// lines tall window over `total` lines.
pub fn scroll_offset(active: Option<usize>, viewport: usize, total: usize) -> usize {
    if viewport == 0 || total <= viewport {
        return 0;
    }
    let Some(active) = active else {
        return 0;
    };
    active.saturating_sub(viewport / 2).min(total - viewport)
}

/// Tracks the active lyric line of the current track.
///
/// Every update recomputes from the full cue list, so seeks in either
/// direction are handled. Only changes are reported.
#[derive(Debug, Default)]
pub struct LyricSync {
    lyrics: Option<ParsedLyrics>,
    active: Option<usize>,
}

impl LyricSync {
    /// Swap in the lyrics of a newly loaded track (or `None` when missing).
    pub fn set_lyrics(&mut self, lyrics: Option<ParsedLyrics>) {
        self.lyrics = lyrics;
        self.active = None;
    }

    pub fn lyrics(&self) -> Option<&ParsedLyrics> {
        self.lyrics.as_ref()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Recompute the active line for `position` (seconds). Returns `true`
    /// only if it differs from the one last reported.
    pub fn update(&mut self, position: f64) -> bool {
        let next = match &self.lyrics {
            Some(ParsedLyrics::Synced(cues)) => active_cue(position, cues),
            _ => None,
        };
        if next == self.active {
            return false;
        }
        self.active = next;
        true
    }
}
