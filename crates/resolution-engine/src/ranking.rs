use crate::types::Format;

fn extension_score(extension: &str) -> u32 {
    match extension {
        "mp3" => 10,
        "opus" => 5,
        _ => 0,
    }
}

fn protocol_score(protocol: &str) -> u32 {
    match protocol {
        "progressive" => 10,
        "hls" => 5,
        _ => 0,
    }
}

pub fn score_format(format: &Format) -> u32 {
    extension_score(&format.extension) + protocol_score(&format.protocol)
}

/// Scores every format and orders them best first. Formats with equal scores
/// keep their input order.
pub fn rank_formats(mut formats: Vec<Format>) -> Vec<Format> {
    for format in formats.iter_mut() {
        format.score = score_format(format);
    }

    // `sort_by` is stable
    formats.sort_by(|a, b| b.score.cmp(&a.score));

    formats
}

#[cfg(test)]
mod tests {
    use super::{rank_formats, score_format};
    use crate::Format;

    fn format(url: &str, extension: &str, protocol: &str) -> Format {
        Format::new(url.into(), extension.into(), "mpeg".into(), protocol.into())
    }

    #[test]
    fn should_score_by_extension_and_protocol() {
        assert_eq!(score_format(&format("a", "mp3", "progressive")), 20);
        assert_eq!(score_format(&format("a", "mp3", "hls")), 15);
        assert_eq!(score_format(&format("a", "opus", "hls")), 10);
        assert_eq!(score_format(&format("a", "opus", "progressive")), 15);
        assert_eq!(score_format(&format("a", "aac", "http")), 0);
    }

    #[test]
    fn should_keep_input_order_of_equal_scores() {
        let formats = vec![
            format("ten", "mp3", "http"),
            format("twenty-1", "mp3", "progressive"),
            format("twenty-2", "mp3", "progressive"),
            format("zero", "aac", "http"),
        ];

        let ranked = rank_formats(formats);

        let urls = ranked.iter().map(|f| f.url.as_str()).collect::<Vec<_>>();
        let scores = ranked.iter().map(|f| f.score).collect::<Vec<_>>();
        assert_eq!(urls, vec!["twenty-1", "twenty-2", "ten", "zero"]);
        assert_eq!(scores, vec![20, 20, 10, 0]);
    }

    #[test]
    fn should_rank_hls_opus_below_progressive_mp3() {
        let formats = vec![
            format("opus-hls", "opus", "hls"),
            format("mp3-hls", "mp3", "hls"),
            format("mp3-progressive", "mp3", "progressive"),
        ];

        let ranked = rank_formats(formats);

        assert_eq!(ranked[0].url, "mp3-progressive");
        assert_eq!(ranked[1].url, "mp3-hls");
        assert_eq!(ranked[2].url, "opus-hls");
    }
}
