//! Server-rendered HTML pages.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::analyzer::VideoAnalysis;
use crate::report::{SeoReport, format_date, format_duration, format_number};
use crate::sections::Section;
use crate::youtube::VideoRecord;

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;color:#222}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #ddd;padding:.4rem;text-align:left}\
.stats{display:flex;flex-wrap:wrap;gap:1rem}.stat{background:#f4f4f4;padding:.6rem 1rem;border-radius:6px}\
.section{background:#fafafa;border-left:4px solid #c00;padding:.5rem 1rem;margin:1rem 0}.error{color:#b00}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        text(title)
    )
}

fn multiline(s: &str) -> String {
    text(s).replace('\n', "<br>\n")
}

pub fn index_page() -> String {
    layout(
        "YouTube SEO",
        "<h1>Herramientas YouTube</h1>\n<ul><li><a href=\"/seo/\">Informe SEO por palabra clave</a></li></ul>",
    )
}

pub fn seo_form_page() -> String {
    layout(
        "Informe SEO",
        "<h1>Informe SEO</h1>\n<form method=\"post\" action=\"/seo/\">\n\
<input type=\"text\" name=\"keyword\" placeholder=\"Palabra clave\" required>\n\
<button type=\"submit\">Generar informe</button>\n</form>",
    )
}

/// Link to the structure analysis of a video, carrying its title
pub fn analyze_href(video_id: &str, title: &str) -> String {
    format!(
        "/seo/analyze-video/{}?title={}",
        urlencoding::encode(video_id),
        urlencoding::encode(title)
    )
}

fn video_row(v: &VideoRecord) -> String {
    let analyze = match &v.video_id {
        Some(id) => format!(
            "<a href=\"{}\">Analizar estructura</a>",
            attr(&analyze_href(id, &v.title))
        ),
        None => "-".to_string(),
    };
    format!(
        "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{analyze}</td></tr>\n",
        attr(&v.video_url),
        text(&v.title),
        text(&v.channel_title),
        format_number(v.views),
        format_number(v.likes),
        format_number(v.comments),
        format_duration(v.duration_secs),
        format_date(&v.published_at),
    )
}

fn stat(label: &str, value: &str) -> String {
    format!("<div class=\"stat\"><strong>{}</strong><br>{}</div>", text(label), text(value))
}

pub fn report_page(report: &SeoReport) -> String {
    let mut body = format!(
        "<h1>Informe para \"{}\"</h1>\n<p>{} videos · {} con análisis disponible</p>\n",
        text(&report.keyword),
        report.videos.len(),
        report.analyzable
    );

    let stats = [
        ("Vistas promedio", format_number(report.avg_views.round() as u64)),
        ("Likes promedio", format_number(report.avg_likes.round() as u64)),
        ("Comentarios promedio", format_number(report.avg_comments.round() as u64)),
        (
            "Duración promedio",
            report
                .avg_duration_secs
                .map(format_duration)
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("Canales únicos", report.unique_channels.to_string()),
        ("Vistas totales", format_number(report.totals.views)),
        ("Likes totales", format_number(report.totals.likes)),
        ("Comentarios totales", format_number(report.totals.comments)),
        ("Últimos 6 meses", report.last_six_months.len().to_string()),
        ("Último año", report.last_year.len().to_string()),
        ("Más de un año", report.older_than_year.len().to_string()),
    ];
    body.push_str("<div class=\"stats\">\n");
    for (label, value) in &stats {
        body.push_str(&stat(label, value));
    }
    body.push_str("\n</div>\n");

    if !report.channel_stats.is_empty() {
        body.push_str("<h2>Canales</h2>\n<table><tr><th>Canal</th><th>Videos</th><th>Vistas</th></tr>\n");
        for c in &report.channel_stats {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                text(&c.channel_title),
                c.videos,
                format_number(c.total_views)
            ));
        }
        body.push_str("</table>\n");
    }

    body.push_str(
        "<h2>Videos</h2>\n<table><tr><th>Título</th><th>Canal</th><th>Vistas</th><th>Likes</th>\
<th>Comentarios</th><th>Duración</th><th>Publicado</th><th></th></tr>\n",
    );
    for v in &report.videos {
        body.push_str(&video_row(v));
    }
    body.push_str("</table>\n<p><a href=\"/seo/\">Nueva búsqueda</a></p>");

    layout(&format!("Informe: {}", report.keyword), &body)
}

pub fn analysis_page(analysis: &VideoAnalysis) -> String {
    let mut body = format!(
        "<h1>Análisis de estructura</h1>\n<h2>{}</h2>\n<p><a href=\"https://www.youtube.com/watch?v={}\">Ver en YouTube</a> · \
{} palabras analizadas · {}</p>\n",
        text(&analysis.video_title),
        attr(&analysis.video_id),
        analysis.transcript_word_count,
        analysis.analyzed_at.format("%d/%m/%Y %H:%M")
    );

    if analysis.sections.is_empty() {
        body.push_str(&format!("<div class=\"section\">{}</div>\n", multiline(&analysis.analysis)));
    } else {
        for section in Section::ALL {
            if let Some(content) = analysis.sections.get(&section) {
                body.push_str(&format!(
                    "<div class=\"section\" id=\"{}\"><h3>{}</h3>\n{}</div>\n",
                    section.key(),
                    text(section.heading()),
                    multiline(content)
                ));
            }
        }
    }

    body.push_str(&format!(
        "<h3>Vista previa de la transcripción</h3>\n<p>{}</p>",
        text(&analysis.transcript_preview)
    ));
    layout(&format!("Análisis: {}", analysis.video_title), &body)
}

pub fn analysis_error_page(video_id: &str, error: &str) -> String {
    layout(
        "Error en el análisis",
        &format!(
            "<h1>No se pudo analizar el video</h1>\n<p class=\"error\">{}</p>\n\
<p><a href=\"https://www.youtube.com/watch?v={}\">Ver video</a> · <a href=\"/seo/\">Volver</a></p>",
            text(error),
            attr(video_id)
        ),
    )
}

pub fn report_error_page(keyword: &str, error: &str) -> String {
    layout(
        "Error en el informe",
        &format!(
            "<h1>Error al generar el informe para \"{}\"</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/seo/\">Volver</a></p>",
            text(keyword),
            text(error)
        ),
    )
}
