//! Report payload as received on the wire, and the validated report.
//!
//! Wire types keep every field optional so that validation can enumerate
//! all missing fields at once instead of failing on the first one.

use serde::{Deserialize, Serialize};

/// Incoming report payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(rename = "paciente_nombre", skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(rename = "paciente_edad", skip_serializing_if = "Option::is_none")]
    pub patient_age: Option<String>,
    #[serde(rename = "paciente_sexo", skip_serializing_if = "Option::is_none")]
    pub patient_sex: Option<String>,
    #[serde(rename = "fecha_analisis", skip_serializing_if = "Option::is_none")]
    pub analysis_date: Option<String>,
    #[serde(rename = "secciones", skip_serializing_if = "Option::is_none")]
    pub sections: Option<SectionsRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding: Option<BrandingRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionsRequest {
    #[serde(rename = "estado_general", skip_serializing_if = "Option::is_none")]
    pub general_state: Option<String>,
    #[serde(rename = "lo_bueno", skip_serializing_if = "Option::is_none")]
    pub positives: Option<String>,
    #[serde(rename = "vigilar", skip_serializing_if = "Option::is_none")]
    pub watch_items: Option<String>,
    #[serde(rename = "alterado", skip_serializing_if = "Option::is_none")]
    pub abnormal_findings: Option<String>,
    #[serde(rename = "como_se_siente", skip_serializing_if = "Option::is_none")]
    pub current_feeling: Option<String>,
    #[serde(rename = "proyeccion", skip_serializing_if = "Option::is_none")]
    pub projection: Option<String>,
    #[serde(rename = "seguimiento", skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    #[serde(rename = "plan_30d", skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(rename = "habitos", default)]
    pub habits: Vec<String>,
    #[serde(rename = "suplementos", default)]
    pub supplements: Vec<SupplementRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplementRequest {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "dosis", skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(rename = "duracion_dias", skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<i64>,
    #[serde(rename = "notas", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(rename = "whatsapp", skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(rename = "distribuidor", skip_serializing_if = "Option::is_none")]
    pub distributor: Option<String>,
}

/// A report that passed validation. Only [`ReportRequest::validate`] builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub(crate) identity: PatientIdentity,
    pub(crate) sections: ReportSections,
    pub(crate) branding: Branding,
}

impl Report {
    pub fn identity(&self) -> &PatientIdentity {
        &self.identity
    }

    pub fn sections(&self) -> &ReportSections {
        &self.sections
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientIdentity {
    pub(crate) name: String,
    pub(crate) age: Option<String>,
    pub(crate) sex: Option<String>,
    pub(crate) analysis_date: String,
}

impl PatientIdentity {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> Option<&str> {
        self.age.as_deref()
    }

    pub fn sex(&self) -> Option<&str> {
        self.sex.as_deref()
    }

    /// The payload date, or the validation day as `dd/mm/YYYY`.
    pub fn analysis_date(&self) -> &str {
        &self.analysis_date
    }
}

/// Narrative sections. Embedded `\n` are hard line breaks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSections {
    pub general_state: String,
    pub positives: String,
    pub watch_items: String,
    pub abnormal_findings: String,
    pub current_feeling: String,
    pub projection: String,
    pub follow_up: String,
    pub plan: ThirtyDayPlan,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThirtyDayPlan {
    pub habits: Vec<String>,
    pub supplements: Vec<Supplement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Supplement {
    pub name: String,
    pub dosage: String,
    pub duration_days: i64,
    pub notes: Option<String>,
}

impl Supplement {
    /// `{name}: {dosage} – {days} {unit}`, then `. {notes}` when present.
    pub fn describe(&self, days_unit: &str) -> String {
        let mut line = format!(
            "{}: {} – {} {}",
            self.name, self.dosage, self.duration_days, days_unit
        );
        if let Some(notes) = &self.notes {
            line.push_str(". ");
            line.push_str(notes);
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branding {
    pub logo: LogoSource,
    pub contact: String,
    pub distributor: String,
}

/// Where the logo may come from. Inline bytes win over the URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogoSource {
    pub base64: Option<String>,
    pub url: Option<String>,
}

impl LogoSource {
    pub fn is_empty(&self) -> bool {
        self.base64.is_none() && self.url.is_none()
    }
}

/// Blank optional strings count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
