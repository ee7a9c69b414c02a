use eyre::Result;

use crate::analyzer::AnalysisResult;
use crate::report::{SeoReport, format_duration, format_number};
use crate::sections::Section;

/// Render an analysis for the terminal: sections under headings, or the raw
/// text when no section markers were found
pub fn render_text(result: &AnalysisResult) -> String {
    let analysis = match result {
        AnalysisResult::Failure { video_id, error } => {
            return format!("Análisis fallido para {video_id}: {error}");
        }
        AnalysisResult::Success(analysis) => analysis,
    };

    let mut out = format!(
        "{} ({})\nPalabras en transcripción: {}\n",
        analysis.video_title, analysis.video_id, analysis.transcript_word_count
    );

    if analysis.sections.is_empty() {
        out.push('\n');
        out.push_str(&analysis.analysis);
        return out;
    }

    for section in Section::ALL {
        if let Some(body) = analysis.sections.get(&section) {
            out.push_str(&format!("\n{}\n{body}\n", section.heading()));
        }
    }
    out
}

/// Render an analysis as pretty-printed JSON
pub fn render_json(result: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Summary table of a keyword report
pub fn render_report(report: &SeoReport) -> String {
    let mut out = format!("Informe para \"{}\": {} videos\n", report.keyword, report.videos.len());
    out.push_str(&format!(
        "Vistas totales: {}  Likes: {}  Comentarios: {}\n",
        format_number(report.totals.views),
        format_number(report.totals.likes),
        format_number(report.totals.comments)
    ));
    out.push_str(&format!(
        "Promedios: {} vistas, {} likes, {} comentarios, duración {}\n",
        format_number(report.avg_views.round() as u64),
        format_number(report.avg_likes.round() as u64),
        format_number(report.avg_comments.round() as u64),
        report
            .avg_duration_secs
            .map(format_duration)
            .unwrap_or_else(|| "-".to_string())
    ));
    out.push_str(&format!(
        "Canales únicos: {}  Últimos 6 meses: {}  Último año: {}  Más antiguos: {}\n",
        report.unique_channels,
        report.last_six_months.len(),
        report.last_year.len(),
        report.older_than_year.len()
    ));

    for v in &report.videos {
        out.push_str(&format!(
            "\n{}\n  {} · {} vistas · {}\n  {}\n",
            v.title,
            v.channel_title,
            format_number(v.views),
            format_duration(v.duration_secs),
            v.video_url
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone, Utc};

    use crate::analyzer::VideoAnalysis;
    use crate::sections::split_sections;

    fn success(analysis: &str) -> AnalysisResult {
        AnalysisResult::Success(VideoAnalysis {
            video_id: "dQw4w9WgXcQ".to_string(),
            video_title: "Paella".to_string(),
            analysis: analysis.to_string(),
            transcript_word_count: 42,
            analyzed_at: Local::now(),
            transcript_preview: "Hola".to_string(),
            sections: split_sections(analysis),
        })
    }

    #[test]
    fn test_render_text_sections() {
        let out = render_text(&success("💡 RECOMENDACIONES\n- Más ritmo\n🎯 INTRO\n- Gancho"));
        assert!(out.starts_with("Paella (dQw4w9WgXcQ)\n"));
        let intro = out.find("🎯 Intro / Hook").unwrap();
        let recs = out.find("💡 Recomendaciones").unwrap();
        // Canonical order regardless of model order
        assert!(intro < recs);
        assert!(out.contains("- Gancho"));
    }

    #[test]
    fn test_render_text_unsectioned() {
        let out = render_text(&success("Texto libre sin marcadores"));
        assert!(out.ends_with("Texto libre sin marcadores"));
    }

    #[test]
    fn test_render_text_failure() {
        let r = AnalysisResult::Failure {
            video_id: "dQw4w9WgXcQ".to_string(),
            error: "sin subtítulos".to_string(),
        };
        assert_eq!(render_text(&r), "Análisis fallido para dQw4w9WgXcQ: sin subtítulos");
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&success("🎯 INTRO\n- Gancho")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["sections"]["intro"], "- Gancho");
        assert_eq!(value["transcript_word_count"], 42);
    }

    #[test]
    fn test_render_report() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let videos = vec![crate::report::tests::video("dQw4w9WgXcQ", "Cocina", 1234, 3, now)];
        let report = SeoReport::build("paella", videos, now);
        let out = render_report(&report);
        assert!(out.starts_with("Informe para \"paella\": 1 videos\n"));
        assert!(out.contains("Vistas totales: 1,234"));
        assert!(out.contains("Video dQw4w9WgXcQ\n  Cocina · 1,234 vistas · 10:00"));
    }
}
