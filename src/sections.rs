//! Splitting the model's free-text critique into named sections.
//!
//! Detection is a heuristic: a section starts on a line carrying both the
//! emoji and the keyword the prompt asks the model to use. If the model
//! rephrases its headings, the text simply ends up unsectioned.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Section buckets, in the order the prompt requests them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Intro,
    Desarrollo,
    Cta,
    Puntuacion,
    Recomendaciones,
}

pub type Sections = BTreeMap<Section, String>;

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Intro,
        Section::Desarrollo,
        Section::Cta,
        Section::Puntuacion,
        Section::Recomendaciones,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::Intro => "intro",
            Section::Desarrollo => "desarrollo",
            Section::Cta => "cta",
            Section::Puntuacion => "puntuacion",
            Section::Recomendaciones => "recomendaciones",
        }
    }

    fn emoji(self) -> &'static str {
        match self {
            Section::Intro => "🎯",
            Section::Desarrollo => "📚",
            Section::Cta => "🚀",
            Section::Puntuacion => "📊",
            Section::Recomendaciones => "💡",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Section::Intro => "INTRO",
            Section::Desarrollo => "DESARROLLO",
            Section::Cta => "CALL",
            Section::Puntuacion => "PUNTUACIÓN",
            Section::Recomendaciones => "RECOMENDACIONES",
        }
    }

    /// Heading shown above the section
    pub fn heading(self) -> &'static str {
        match self {
            Section::Intro => "🎯 Intro / Hook",
            Section::Desarrollo => "📚 Desarrollo",
            Section::Cta => "🚀 Call-to-Action",
            Section::Puntuacion => "📊 Puntuación general",
            Section::Recomendaciones => "💡 Recomendaciones",
        }
    }

    /// The section a marker line opens, if any
    pub fn from_marker(line: &str) -> Option<Section> {
        let upper = line.to_uppercase();
        Section::ALL
            .into_iter()
            .find(|s| line.contains(s.emoji()) && upper.contains(s.keyword()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Partition analysis text into sections by their marker lines
pub fn split_sections(text: &str) -> Sections {
    let mut sections = Sections::new();
    let mut current: Option<Section> = None;
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(next) = Section::from_marker(line) {
            if let Some(section) = current {
                close(&mut sections, section, &lines);
            }
            current = Some(next);
            lines.clear();
        } else if current.is_some() {
            lines.push(line);
        }
    }

    if let Some(section) = current {
        close(&mut sections, section, &lines);
    }

    sections
}

fn close(sections: &mut Sections, section: Section, lines: &[&str]) {
    if !lines.is_empty() {
        sections.insert(section, lines.join("\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ANALYSIS: &str = "Aquí está el análisis solicitado.

🎯 **INTRO/HOOK (0-30 segundos)**
- **Técnica utilizada:** Pregunta directa
- **Efectividad:** 8

📚 **DESARROLLO (Cuerpo principal)**
- **Estructura:** Por puntos

🚀 **CALL-TO-ACTION**
- **Tipo:** Suscripción

📊 **PUNTUACIÓN GENERAL**
- **TOTAL:** 7

💡 **RECOMENDACIONES**
- Acortar la intro
- Añadir capítulos
";

    #[test]
    fn test_split_all_sections() {
        let sections = split_sections(FULL_ANALYSIS);
        assert_eq!(sections.len(), 5);
        assert_eq!(
            sections[&Section::Intro],
            "- **Técnica utilizada:** Pregunta directa\n- **Efectividad:** 8"
        );
        assert_eq!(sections[&Section::Desarrollo], "- **Estructura:** Por puntos");
        assert_eq!(sections[&Section::Cta], "- **Tipo:** Suscripción");
        assert_eq!(sections[&Section::Puntuacion], "- **TOTAL:** 7");
        assert_eq!(
            sections[&Section::Recomendaciones],
            "- Acortar la intro\n- Añadir capítulos"
        );
    }

    #[test]
    fn test_preamble_is_discarded() {
        let sections = split_sections(FULL_ANALYSIS);
        assert!(sections.values().all(|v| !v.contains("Aquí está")));
    }

    #[test]
    fn test_no_markers() {
        assert!(split_sections("Solo texto libre\nsin encabezados").is_empty());
        assert!(split_sections("").is_empty());
    }

    #[test]
    fn test_emoji_without_keyword_is_content() {
        let text = "🎯 INTRO\n🎯 el objetivo es claro\n📊 datos sueltos";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[&Section::Intro],
            "🎯 el objetivo es claro\n📊 datos sueltos"
        );
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let text = "🚀 Call-to-action\nSuscríbete\n📊 Puntuación general\nTotal 6";
        let sections = split_sections(text);
        assert_eq!(sections[&Section::Cta], "Suscríbete");
        assert_eq!(sections[&Section::Puntuacion], "Total 6");
    }

    #[test]
    fn test_empty_sections_are_absent() {
        let text = "🎯 INTRO\n\n📚 DESARROLLO\ncontenido";
        let sections = split_sections(text);
        assert!(!sections.contains_key(&Section::Intro));
        assert_eq!(sections[&Section::Desarrollo], "contenido");
    }

    #[test]
    fn test_repeated_marker_last_write_wins() {
        let text = "🎯 INTRO\nprimera\n📚 DESARROLLO\ncuerpo\n🎯 INTRO otra vez\nsegunda";
        let sections = split_sections(text);
        assert_eq!(sections[&Section::Intro], "segunda");
        assert_eq!(sections[&Section::Desarrollo], "cuerpo");
    }

    #[test]
    fn test_first_matching_section_wins() {
        // Both intro and recomendaciones markers on one line
        let text = "🎯 💡 INTRO y RECOMENDACIONES\nmezcla";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[&Section::Intro], "mezcla");
    }

    #[test]
    fn test_section_keys() {
        let keys: Vec<_> = Section::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys, ["intro", "desarrollo", "cta", "puntuacion", "recomendaciones"]);
        assert_eq!(
            serde_json::to_string(&Section::Puntuacion).unwrap(),
            "\"puntuacion\""
        );
    }
}
