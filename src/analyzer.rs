use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{error, info};
use serde::Serialize;

use crate::completion::{CompletionRequest, CompletionService};
use crate::sections::{Sections, split_sections};
use crate::transcript::{Transcript, fetch_transcript};
use crate::youtube::CaptionService;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "Eres un experto en análisis de contenido de YouTube y estructura narrativa. \
Proporciona análisis detallados y constructivos.";

pub const NOT_CONFIGURED_MSG: &str = "OpenAI no está configurado correctamente. Verifica la API key.";
pub const NO_TRANSCRIPT_MSG: &str = "No se pudo obtener la transcripción del video. \
Asegúrate de que tenga subtítulos automáticos.";

/// A completed structure analysis
#[derive(Debug, Clone, Serialize)]
pub struct VideoAnalysis {
    pub video_id: String,
    pub video_title: String,
    pub analysis: String,
    pub transcript_word_count: usize,
    pub analyzed_at: DateTime<Local>,
    pub transcript_preview: String,
    pub sections: Sections,
}

/// Outcome of one analysis request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisResult {
    Success(VideoAnalysis),
    Failure { video_id: String, error: String },
}

impl AnalysisResult {
    fn failure(video_id: &str, error: impl Into<String>) -> Self {
        AnalysisResult::Failure {
            video_id: video_id.to_string(),
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success(_))
    }

    pub fn video_id(&self) -> &str {
        match self {
            AnalysisResult::Success(a) => &a.video_id,
            AnalysisResult::Failure { video_id, .. } => video_id,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisResult::Success(_) => None,
            AnalysisResult::Failure { error, .. } => Some(error),
        }
    }

    /// Turn a failure into an error for callers that report through `Result`
    pub fn check(&self) -> eyre::Result<()> {
        match self {
            AnalysisResult::Success(_) => Ok(()),
            AnalysisResult::Failure { video_id, error } => eyre::bail!("analysis of {video_id} failed: {error}"),
        }
    }

    /// `None` for failed analyses
    pub fn sections(&self) -> Option<&Sections> {
        match self {
            AnalysisResult::Success(a) => Some(&a.sections),
            AnalysisResult::Failure { .. } => None,
        }
    }
}

/// Runs transcript → prompt → completion → sections for one video
#[derive(Clone)]
pub struct Analyzer {
    captions: Option<Arc<dyn CaptionService>>,
    completion: Option<Arc<dyn CompletionService>>,
    model: String,
}

impl Analyzer {
    pub fn new(
        captions: Option<Arc<dyn CaptionService>>,
        completion: Option<Arc<dyn CompletionService>>,
    ) -> Self {
        Self {
            captions,
            completion,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn captions_configured(&self) -> bool {
        self.captions.is_some()
    }

    pub fn completion_configured(&self) -> bool {
        self.completion.is_some()
    }

    /// Analyze the narrative structure of a video. Never fails: every error
    /// ends up in `AnalysisResult::Failure`.
    pub async fn analyze(&self, video_id: &str, video_title: &str) -> AnalysisResult {
        info!("Starting analysis for video {video_id}");

        let Some(completion) = self.completion.as_deref() else {
            return AnalysisResult::failure(video_id, NOT_CONFIGURED_MSG);
        };

        match self.run(completion, video_id, video_title).await {
            Ok(result) => result,
            Err(e) => {
                let msg = format!("Error al analizar el video: {e}");
                error!("{msg}");
                AnalysisResult::failure(video_id, msg)
            }
        }
    }

    async fn run(
        &self,
        completion: &dyn CompletionService,
        video_id: &str,
        video_title: &str,
    ) -> eyre::Result<AnalysisResult> {
        let Some(transcript) = fetch_transcript(self.captions.as_deref(), video_id).await? else {
            return Ok(AnalysisResult::failure(video_id, NO_TRANSCRIPT_MSG));
        };

        let request = CompletionRequest {
            model: self.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            prompt: build_prompt(video_title, &transcript.text),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let analysis = completion.complete(&request).await?.trim().to_string();
        info!("Analysis completed for video {video_id}");

        Ok(AnalysisResult::Success(assemble(
            video_id,
            video_title,
            analysis,
            &transcript,
        )))
    }
}

fn assemble(video_id: &str, video_title: &str, analysis: String, transcript: &Transcript) -> VideoAnalysis {
    VideoAnalysis {
        video_id: video_id.to_string(),
        video_title: video_title.to_string(),
        sections: split_sections(&analysis),
        analysis,
        transcript_word_count: transcript.word_count,
        analyzed_at: Local::now(),
        transcript_preview: transcript.preview(),
    }
}

/// The fixed analysis template, filled with the title and transcript
pub fn build_prompt(video_title: &str, transcript: &str) -> String {
    format!(
        r#"
Analiza esta transcripción de un video de YouTube titulado "{video_title}" y proporciona un análisis estructurado.

FORMATO DE RESPUESTA:

🎯 **INTRO/HOOK (0-30 segundos)**
- **Técnica utilizada:** [Describe cómo captura la atención]
- **Promesa/Expectativa:** [Qué promete al viewer]
- **Efectividad:** [1-10] [Explicación breve]

📚 **DESARROLLO (Cuerpo principal)**
- **Estructura:** [Lineal/Por puntos/Narrativa/etc.]
- **Técnicas de retención:** [Qué usa para mantener atención]
- **Ritmo:** [Rápido/Moderado/Lento y por qué]
- **Transiciones:** [Cómo conecta las ideas]

🚀 **CALL-TO-ACTION**
- **Tipo:** [Suscripción/Like/Comentario/Link/etc.]
- **Momento:** [Cuándo aparece en el video]
- **Claridad:** [1-10] [Qué tan claro es]

📊 **PUNTUACIÓN GENERAL**
- **Estructura:** [1-10]
- **Engagement:** [1-10]
- **Profesionalismo:** [1-10]
- **TOTAL:** [1-10]

💡 **RECOMENDACIONES**
- [3-5 mejoras específicas que harían el video más efectivo]

TRANSCRIPCIÓN:
{transcript}
"#
    )
}
