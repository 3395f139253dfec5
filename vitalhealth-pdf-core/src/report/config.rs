use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Branding text, labels and colours used when rendering a report.
///
/// Every field has a default, so a partial JSON document (for example just
/// `{"default_contact": "300 000 0000"}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Name reported by the service info endpoint
    pub service_title: String,
    /// Report heading drawn under the logo
    pub heading: String,
    /// Line drawn under the heading
    pub subtitle: String,
    /// Distributor used when the payload does not carry one
    pub default_distributor: String,
    /// Contact channel used when the payload does not carry one
    pub default_contact: String,
    /// Label written before the contact in the follow-up section
    pub contact_label: String,
    /// First footer line, followed by ` • {distributor}`
    pub attribution: String,
    /// Second footer line
    pub disclaimer: String,
    /// Leading part of the suggested download file name
    pub filename_prefix: String,
    /// Rendered in place of absent optional identity fields
    pub placeholder: String,
    pub labels: SectionLabels,
    pub palette: Palette,
    /// Upper bound for fetching a logo by URL
    pub logo_timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            service_title: "VitalHealth Analyzer Pro – PDF Service".to_string(),
            heading: "ANÁLISIS CUÁNTICO DE SALUD".to_string(),
            subtitle: "Informe generado mediante tecnología cuántica de VitalHealth Analyzer Pro."
                .to_string(),
            default_distributor: "Jair Montilla – VitalHealth Colombia".to_string(),
            default_contact: "316 709 9568".to_string(),
            contact_label: "WhatsApp".to_string(),
            attribution: "Informe generado mediante tecnología cuántica de VitalHealth Analyzer Pro"
                .to_string(),
            disclaimer: "Este documento es informativo y no sustituye valoración médica."
                .to_string(),
            filename_prefix: "Informe_Cuantico".to_string(),
            placeholder: "-".to_string(),
            labels: SectionLabels::default(),
            palette: Palette::default(),
            logo_timeout_secs: 8,
        }
    }
}

impl RenderConfig {
    pub fn logo_timeout(&self) -> Duration {
        Duration::from_secs(self.logo_timeout_secs)
    }
}

/// Section titles and fixed labels of the report body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLabels {
    pub patient: String,
    pub age: String,
    pub sex: String,
    pub date: String,
    pub general_state: String,
    pub positives: String,
    pub watch_items: String,
    pub abnormal_findings: String,
    pub current_feeling: String,
    pub plan: String,
    pub habits: String,
    pub supplements: String,
    pub projection: String,
    pub follow_up: String,
    /// Unit written after a supplement's duration
    pub days: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            patient: "Paciente".to_string(),
            age: "Edad".to_string(),
            sex: "Sexo".to_string(),
            date: "Fecha".to_string(),
            general_state: "Estado general".to_string(),
            positives: "Lo bueno".to_string(),
            watch_items: "Lo que hay que vigilar".to_string(),
            abnormal_findings: "Lo que está alterado".to_string(),
            current_feeling: "Cómo se siente actualmente".to_string(),
            plan: "Plan de acción VitalHealth (30 días)".to_string(),
            habits: "Hábitos:".to_string(),
            supplements: "Suplementación recomendada:".to_string(),
            projection: "Proyección de mejora".to_string(),
            follow_up: "Seguimiento y contacto".to_string(),
            days: "días".to_string(),
        }
    }
}

/// Report colours as `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub accent: String,
    pub muted: String,
    pub body: String,
    pub footer: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#F5F1E8".to_string(),
            accent: "#005532".to_string(),
            muted: "#555555".to_string(),
            body: "#000000".to_string(),
            footer: "#666666".to_string(),
        }
    }
}
