use std::path::{Path, PathBuf};

use textgrid::{TextGrid, TierType};

use crate::config::LabelFormat;
use crate::error::OtoError;
use crate::types::PhonemeSegment;

/// Pause and breath symbols the aligner emits between phones.
pub const NON_PHONEME_SYMBOLS: [&str; 2] = ["SP", "AP"];

const HTK_TICKS_PER_SECOND: f64 = 1e7;
const PHONES_TIER: &str = "phones";

/// Where the aligner export for a sample lives inside a voicebank directory.
pub fn label_path(voicebank_dir: &Path, stem: &str, format: LabelFormat) -> PathBuf {
    match format {
        LabelFormat::Htk => voicebank_dir
            .join("htk")
            .join("phones")
            .join(format!("{stem}.lab")),
        LabelFormat::TextGrid => voicebank_dir
            .join("textgrid")
            .join(format!("{stem}.TextGrid")),
    }
}

/// Reads a label file and returns its phonemes without pauses or breaths.
pub fn load_phonemes(path: &Path, format: LabelFormat) -> Result<Vec<PhonemeSegment>, OtoError> {
    let segments = match format {
        LabelFormat::Htk => {
            let contents =
                std::fs::read_to_string(path).map_err(|e| OtoError::io("read label file", e))?;
            parse_htk_label(&contents, path)?
        }
        LabelFormat::TextGrid => read_textgrid_phones(path)?,
    };
    Ok(filter_pauses(segments))
}

/// `phones` tier through the `textgrid` crate, falling back to the line
/// parser for long-format files the crate rejects.
fn read_textgrid_phones(path: &Path) -> Result<Vec<PhonemeSegment>, OtoError> {
    let crate_err = match phones_with_textgrid_crate(path) {
        Ok(segments) => return Ok(segments),
        Err(err) => err,
    };
    tracing::debug!(path = %path.display(), error = %crate_err, "label: textgrid crate failed, using line parser");

    let contents = std::fs::read_to_string(path).map_err(|e| OtoError::io("read label file", e))?;
    parse_textgrid_phones(&contents, path).map_err(|fallback_err| {
        OtoError::label(
            path,
            0,
            format!("textgrid crate ({crate_err}) and line parser ({fallback_err}) both failed"),
        )
    })
}

fn phones_with_textgrid_crate(path: &Path) -> Result<Vec<PhonemeSegment>, OtoError> {
    let textgrid = TextGrid::from_file(path)
        .map_err(|err| OtoError::label(path, 0, format!("textgrid crate parse failed: {err}")))?;

    let phones_tier = textgrid
        .tiers
        .iter()
        .find(|tier| {
            tier.tier_type == TierType::IntervalTier && tier.name.eq_ignore_ascii_case(PHONES_TIER)
        })
        .ok_or_else(|| {
            OtoError::label(path, 0, format!("missing IntervalTier named '{PHONES_TIER}'"))
        })?;

    let mut segments = Vec::new();
    for interval in &phones_tier.intervals {
        let symbol = interval.text.trim();
        if symbol.is_empty() {
            continue;
        }
        let start = checked_seconds(interval.xmin, path, 0)?;
        let end = checked_seconds(interval.xmax, path, 0)?;
        segments.push(checked_segment(
            symbol,
            seconds_to_ticks(start),
            seconds_to_ticks(end),
            path,
            0,
        )?);
    }
    Ok(segments)
}

pub fn filter_pauses(segments: Vec<PhonemeSegment>) -> Vec<PhonemeSegment> {
    segments
        .into_iter()
        .filter(|s| !NON_PHONEME_SYMBOLS.contains(&s.symbol.as_str()))
        .collect()
}

/// `start end symbol` per line, integer times.
pub fn parse_htk_label(contents: &str, path: &Path) -> Result<Vec<PhonemeSegment>, OtoError> {
    let mut segments = Vec::new();
    for (idx, raw_line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [start, end, symbol] = fields[..] else {
            return Err(OtoError::label(
                path,
                line_no,
                format!("expected 'start end symbol', got {} field(s)", fields.len()),
            ));
        };
        let start = parse_tick(start, path, line_no, "start")?;
        let end = parse_tick(end, path, line_no, "end")?;
        segments.push(checked_segment(symbol, start, end, path, line_no)?);
    }
    Ok(segments)
}

/// Interval tier named `phones` of a long-format TextGrid.
pub fn parse_textgrid_phones(
    contents: &str,
    path: &Path,
) -> Result<Vec<PhonemeSegment>, OtoError> {
    let mut in_item = false;
    let mut item_is_interval_tier = false;
    let mut item_is_phones_tier = false;
    let mut seen_phones_tier = false;

    let mut cur_xmin: Option<f64> = None;
    let mut cur_xmax: Option<f64> = None;
    let mut segments = Vec::new();

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.starts_with("item [") {
            in_item = true;
            item_is_interval_tier = false;
            item_is_phones_tier = false;
            cur_xmin = None;
            cur_xmax = None;
            continue;
        }
        if !in_item {
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "class") {
            item_is_interval_tier = value.eq_ignore_ascii_case("\"IntervalTier\"");
            continue;
        }
        if let Some(value) = parse_assignment_value(line, "name") {
            item_is_phones_tier = strip_quotes(value).eq_ignore_ascii_case(PHONES_TIER);
            seen_phones_tier |= item_is_interval_tier && item_is_phones_tier;
            continue;
        }
        if !(item_is_interval_tier && item_is_phones_tier) {
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "xmin") {
            cur_xmin = Some(parse_seconds(value, path, line_no)?);
            continue;
        }
        if let Some(value) = parse_assignment_value(line, "xmax") {
            cur_xmax = Some(parse_seconds(value, path, line_no)?);
            continue;
        }
        if let Some(value) = parse_assignment_value(line, "text") {
            let symbol = strip_quotes(value).trim();
            let (Some(xmin), Some(xmax)) = (cur_xmin, cur_xmax) else {
                return Err(OtoError::label(path, line_no, "text without xmin/xmax"));
            };
            if !symbol.is_empty() {
                segments.push(checked_segment(
                    symbol,
                    seconds_to_ticks(xmin),
                    seconds_to_ticks(xmax),
                    path,
                    line_no,
                )?);
            }
            cur_xmin = None;
            cur_xmax = None;
            continue;
        }
        if line.starts_with("intervals [") {
            cur_xmin = None;
            cur_xmax = None;
        }
    }

    if !seen_phones_tier {
        return Err(OtoError::label(
            path,
            0,
            format!("missing IntervalTier named '{PHONES_TIER}'"),
        ));
    }
    Ok(segments)
}

fn checked_segment(
    symbol: &str,
    start: i64,
    end: i64,
    path: &Path,
    line_no: usize,
) -> Result<PhonemeSegment, OtoError> {
    if start > end {
        return Err(OtoError::label(
            path,
            line_no,
            format!("segment '{symbol}' ends before it starts ({start} > {end})"),
        ));
    }
    Ok(PhonemeSegment::new(symbol, start, end))
}

fn parse_tick(value: &str, path: &Path, line_no: usize, field: &str) -> Result<i64, OtoError> {
    value
        .parse::<i64>()
        .map_err(|err| OtoError::label(path, line_no, format!("invalid {field} '{value}': {err}")))
}

fn parse_seconds(value: &str, path: &Path, line_no: usize) -> Result<f64, OtoError> {
    let seconds = value
        .trim()
        .parse::<f64>()
        .map_err(|err| OtoError::label(path, line_no, format!("invalid time '{value}': {err}")))?;
    checked_seconds(seconds, path, line_no)
}

fn checked_seconds(seconds: f64, path: &Path, line_no: usize) -> Result<f64, OtoError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(OtoError::label(
            path,
            line_no,
            format!("invalid time {seconds}"),
        ));
    }
    Ok(seconds)
}

fn seconds_to_ticks(seconds: f64) -> i64 {
    (seconds * HTK_TICKS_PER_SECOND).round() as i64
}

fn parse_assignment_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (lhs, rhs) = line.split_once('=')?;
    if lhs.trim() == key {
        Some(rhs.trim())
    } else {
        None
    }
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTK: &str = "0 1500000 SP\n\
                       1500000 2000000 k\n\
                       2000000 3500000 a\n\
                       3500000 3600000 AP\n\
                       3600000 4000000 N\n";

    const TEXTGRID: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

xmin = 0
xmax = 0.4
tiers? <exists>
size = 2
item []:
    item [1]:
        class = "IntervalTier"
        name = "words"
        xmin = 0
        xmax = 0.4
        intervals: size = 1
        intervals [1]:
            xmin = 0
            xmax = 0.4
            text = "か"
    item [2]:
        class = "IntervalTier"
        name = "phones"
        xmin = 0
        xmax = 0.4
        intervals: size = 3
        intervals [1]:
            xmin = 0
            xmax = 0.15
            text = "SP"
        intervals [2]:
            xmin = 0.15
            xmax = 0.2
            text = "k"
        intervals [3]:
            xmin = 0.2
            xmax = 0.35
            text = "a"
"#;

    fn path() -> &'static Path {
        Path::new("_か.lab")
    }

    #[test]
    fn htk_label_parses_and_filters() {
        let raw = parse_htk_label(HTK, path()).unwrap();
        assert_eq!(raw.len(), 5);
        let filtered = filter_pauses(raw);
        let symbols: Vec<&str> = filtered.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["k", "a", "N"]);
        assert_eq!(filtered[0], PhonemeSegment::new("k", 1_500_000, 2_000_000));
    }

    #[test]
    fn htk_blank_lines_are_skipped() {
        let segs = parse_htk_label("\n0 10 a\n\n10 20 i\n", path()).unwrap();
        assert_eq!(segs.len(), 2);
    }

    #[test]
    fn htk_wrong_field_count_is_error() {
        let err = parse_htk_label("0 10 a\n10 20\n", path()).unwrap_err();
        match err {
            OtoError::Label { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn htk_non_integer_time_is_error() {
        assert!(matches!(
            parse_htk_label("0 1.5 a\n", path()),
            Err(OtoError::Label { line: 1, .. })
        ));
    }

    #[test]
    fn htk_reversed_interval_is_error() {
        assert!(matches!(
            parse_htk_label("20 10 a\n", path()),
            Err(OtoError::Label { line: 1, .. })
        ));
    }

    #[test]
    fn textgrid_phones_tier_in_ticks() {
        let segs = filter_pauses(parse_textgrid_phones(TEXTGRID, path()).unwrap());
        assert_eq!(
            segs,
            vec![
                PhonemeSegment::new("k", 1_500_000, 2_000_000),
                PhonemeSegment::new("a", 2_000_000, 3_500_000),
            ]
        );
    }

    #[test]
    fn textgrid_without_phones_tier_is_error() {
        let words_only = TEXTGRID.split("    item [2]:").next().unwrap();
        assert!(matches!(
            parse_textgrid_phones(words_only, path()),
            Err(OtoError::Label { .. })
        ));
    }

    const SHORT_TEXTGRID: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

0
0.35
<exists>
1
"IntervalTier"
"phones"
0
0.35
3
0
0.15
"SP"
0.15
0.2
"k"
0.2
0.35
"a"
"#;

    fn write_grid(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "sofa_oto_rs-label-{}-{name}.TextGrid",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("write TextGrid");
        path
    }

    fn expected_ka() -> Vec<PhonemeSegment> {
        vec![
            PhonemeSegment::new("k", 1_500_000, 2_000_000),
            PhonemeSegment::new("a", 2_000_000, 3_500_000),
        ]
    }

    #[test]
    fn short_format_textgrid_is_loaded() {
        let path = write_grid("short", SHORT_TEXTGRID);
        let segs = load_phonemes(&path, LabelFormat::TextGrid);
        let _ = std::fs::remove_file(&path);
        assert_eq!(segs.expect("short-format grid"), expected_ka());
    }

    #[test]
    fn long_format_textgrid_is_loaded() {
        let path = write_grid("long", TEXTGRID);
        let segs = load_phonemes(&path, LabelFormat::TextGrid);
        let _ = std::fs::remove_file(&path);
        assert_eq!(segs.expect("long-format grid"), expected_ka());
    }

    #[test]
    fn textgrid_file_without_phones_tier_is_label_error() {
        let words_only = TEXTGRID.split("    item [2]:").next().unwrap().replace("size = 2", "size = 1");
        let path = write_grid("words-only", &words_only);
        let result = load_phonemes(&path, LabelFormat::TextGrid);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(OtoError::Label { .. })));
    }

    #[test]
    fn label_paths_follow_export_layout() {
        let dir = Path::new("vb");
        assert_eq!(
            label_path(dir, "_あ", LabelFormat::Htk),
            Path::new("vb/htk/phones/_あ.lab")
        );
        assert_eq!(
            label_path(dir, "_あ", LabelFormat::TextGrid),
            Path::new("vb/textgrid/_あ.TextGrid")
        );
    }
}
