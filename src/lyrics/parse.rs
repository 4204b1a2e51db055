/// A single lyric line. `time` is in seconds from the start of the track.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricCue {
    pub time: f64,
    pub text: String,
}

/// Parsed lyric source.
///
/// `Synced` cues are sorted by time (ties keep source order). `Static` cues
/// all sit at time 0 and never become active.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLyrics {
    Synced(Vec<LyricCue>),
    Static(Vec<LyricCue>),
}

impl ParsedLyrics {
    pub fn cues(&self) -> &[LyricCue] {
        match self {
            Self::Synced(cues) | Self::Static(cues) => cues,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    pub fn is_empty(&self) -> bool {
        self.cues().is_empty()
    }
}

impl Default for ParsedLyrics {
    fn default() -> Self {
        Self::Static(Vec::new())
    }
}

/// Consume 1..=max ASCII digits from the front of `s`.
fn take_digits(s: &str, max: usize) -> Option<(&str, &str)> {
    let len = s
        .bytes()
        .take(max + 1)
        .take_while(u8::is_ascii_digit)
        .count();
    if len == 0 || len > max {
        return None;
    }
    Some(s.split_at(len))
}

/// Match a leading `[mm:ss]` / `[mm:ss.fff]` stamp. Returns the time in
/// seconds and the rest of the line.
fn leading_timestamp(line: &str) -> Option<(f64, &str)> {
    let rest = line.strip_prefix('[')?;
    let (minutes, rest) = take_digits(rest, 2)?;
    let rest = rest.strip_prefix(':')?;
    let (seconds, rest) = take_digits(rest, 2)?;

    let (fraction, rest) = match rest.strip_prefix('.') {
        Some(after_dot) => {
            let (digits, rest) = take_digits(after_dot, 3)?;
            (Some(digits), rest)
        }
        None => (None, rest),
    };
    let rest = rest.strip_prefix(']')?;

    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    let fraction: f64 = match fraction {
        Some(digits) => format!("0.{digits}").parse().ok()?,
        None => 0.0,
    };

    Some((minutes * 60.0 + seconds + fraction, rest))
}

/// Lines like `[ar:Someone]` carry metadata, not lyrics.
fn is_bracketed(line: &str) -> bool {
    line.len() >= 2
        && line.starts_with('[')
        && line.ends_with(']')
        && !line[1..line.len() - 1].contains(']')
}

/// Parse raw lyric text.
///
/// If any line starts with a timestamp the result is `Synced` and only
/// timestamped lines with non-empty text become cues. Otherwise every
/// non-blank, non-bracketed line becomes a `Static` cue.
pub fn parse(raw: &str) -> ParsedLyrics {
    let lines: Vec<&str> = raw
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut synced: Vec<LyricCue> = Vec::new();
    let mut any_timestamp = false;

    for line in &lines {
        if let Some((time, text)) = leading_timestamp(line) {
            any_timestamp = true;
            let text = text.trim();
            if !text.is_empty() {
                synced.push(LyricCue {
                    time,
                    text: text.to_string(),
                });
            }
        }
    }

    if any_timestamp {
        // `sort_by` is stable, so equal stamps keep their source order.
        synced.sort_by(|a, b| a.time.total_cmp(&b.time));
        return ParsedLyrics::Synced(synced);
    }

    ParsedLyrics::Static(
        lines
            .into_iter()
            .filter(|l| !is_bracketed(l))
            .map(|l| LyricCue {
                time: 0.0,
                text: l.to_string(),
            })
            .collect(),
    )
}
