use crate::report::config::RenderConfig;
use crate::report::model::{
    non_blank, Branding, BrandingRequest, LogoSource, PatientIdentity, PlanRequest, Report,
    ReportRequest, ReportSections, SectionsRequest, Supplement, SupplementRequest, ThirtyDayPlan,
};
use chrono::{Local, NaiveDate};
use serde::{Deserializer, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Format of the analysis date filled in when the payload has none.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    Empty,
    /// Present, but of the wrong JSON type
    InvalidType,
}

/// One offending field, addressed by its dotted wire path
/// (`secciones.plan_30d.suplementos[0].dosis`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub problem: FieldProblem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            FieldProblem::Missing => write!(f, "{} is missing", self.field),
            FieldProblem::Empty => write!(f, "{} is empty", self.field),
            FieldProblem::InvalidType => write!(f, "{} has an invalid type", self.field),
        }
    }
}

/// The payload lacks required data. Lists every offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid report payload: {}", describe(.fields))]
pub struct ValidationError {
    fields: Vec<FieldError>,
}

fn describe(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn field_paths(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }
}

#[derive(Default)]
struct Checker {
    problems: Vec<FieldError>,
}

impl Checker {
    fn report(&mut self, field: impl Into<String>, problem: FieldProblem) {
        self.problems.push(FieldError {
            field: field.into(),
            problem,
        });
    }

    fn required<T: Default>(&mut self, field: impl Into<String>, value: Option<T>) -> T {
        value.unwrap_or_else(|| {
            self.report(field, FieldProblem::Missing);
            T::default()
        })
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.problems.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                fields: self.problems,
            })
        }
    }
}

impl ReportRequest {
    /// Deserializes a payload, naming the offending field when a value has
    /// the wrong type (`secciones.plan_30d.suplementos[0].duracion_dias`).
    ///
    /// Syntax errors should be caught before this, for instance by parsing
    /// into `serde_json::Value` first; otherwise they are reported at the
    /// field being read when the input broke off.
    pub fn deserialize_from<'de, D>(deserializer: D) -> Result<Self, ValidationError>
    where
        D: Deserializer<'de>,
    {
        serde_path_to_error::deserialize(deserializer).map_err(|err| {
            let path = err.path().to_string();
            debug!(path, error = %err.inner(), "Payload does not match the report schema");
            let field = if path == "." {
                "<root>".to_string()
            } else {
                path
            };
            ValidationError {
                fields: vec![FieldError {
                    field,
                    problem: FieldProblem::InvalidType,
                }],
            }
        })
    }

    /// Validates the payload, stamping today's local date when the analysis
    /// date is absent.
    pub fn validate(self, config: &RenderConfig) -> Result<Report, ValidationError> {
        self.validate_on(config, Local::now().date_naive())
    }

    pub fn validate_on(
        self,
        config: &RenderConfig,
        today: NaiveDate,
    ) -> Result<Report, ValidationError> {
        let mut checker = Checker::default();

        let name = match self.patient_name {
            None => {
                checker.report("paciente_nombre", FieldProblem::Missing);
                String::new()
            }
            Some(name) if name.trim().is_empty() => {
                checker.report("paciente_nombre", FieldProblem::Empty);
                String::new()
            }
            Some(name) => name.trim().to_string(),
        };

        let identity = PatientIdentity {
            name,
            age: non_blank(self.patient_age),
            sex: non_blank(self.patient_sex),
            analysis_date: non_blank(self.analysis_date)
                .unwrap_or_else(|| today.format(DATE_FORMAT).to_string()),
        };

        let sections = match self.sections {
            Some(sections) => check_sections(&mut checker, sections),
            None => {
                checker.report("secciones", FieldProblem::Missing);
                ReportSections::default()
            }
        };

        let branding = resolve_branding(self.branding.unwrap_or_default(), config);

        checker.finish(Report {
            identity,
            sections,
            branding,
        })
    }
}

fn check_sections(checker: &mut Checker, sections: SectionsRequest) -> ReportSections {
    let general_state = checker.required("secciones.estado_general", sections.general_state);
    let positives = checker.required("secciones.lo_bueno", sections.positives);
    let watch_items = checker.required("secciones.vigilar", sections.watch_items);
    let abnormal_findings = checker.required("secciones.alterado", sections.abnormal_findings);
    let current_feeling = checker.required("secciones.como_se_siente", sections.current_feeling);
    let projection = checker.required("secciones.proyeccion", sections.projection);
    let follow_up = checker.required("secciones.seguimiento", sections.follow_up);
    let plan = checker.required::<PlanRequest>("secciones.plan_30d", sections.plan);

    ReportSections {
        general_state,
        positives,
        watch_items,
        abnormal_findings,
        current_feeling,
        projection,
        follow_up,
        plan: check_plan(checker, plan),
    }
}

fn check_plan(checker: &mut Checker, plan: PlanRequest) -> ThirtyDayPlan {
    let supplements = plan
        .supplements
        .into_iter()
        .enumerate()
        .map(|(index, supplement)| check_supplement(checker, index, supplement))
        .collect();

    ThirtyDayPlan {
        habits: plan.habits,
        supplements,
    }
}

fn check_supplement(
    checker: &mut Checker,
    index: usize,
    supplement: SupplementRequest,
) -> Supplement {
    let path = format!("secciones.plan_30d.suplementos[{index}]");
    Supplement {
        name: checker.required(format!("{path}.nombre"), supplement.name),
        dosage: checker.required(format!("{path}.dosis"), supplement.dosage),
        duration_days: checker.required(format!("{path}.duracion_dias"), supplement.duration_days),
        notes: non_blank(supplement.notes),
    }
}

fn resolve_branding(branding: BrandingRequest, config: &RenderConfig) -> Branding {
    Branding {
        logo: LogoSource {
            base64: non_blank(branding.logo_base64),
            url: non_blank(branding.logo_url),
        },
        contact: branding
            .contact
            .unwrap_or_else(|| config.default_contact.clone()),
        distributor: branding
            .distributor
            .unwrap_or_else(|| config.default_distributor.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn minimal() -> serde_json::Value {
        json!({
            "paciente_nombre": "Ana María Pérez",
            "secciones": {
                "estado_general": "Estable",
                "lo_bueno": "Hidratación",
                "vigilar": "Colesterol",
                "alterado": "Ninguno",
                "como_se_siente": "Bien",
                "proyeccion": "Favorable",
                "seguimiento": "Control mensual",
                "plan_30d": {}
            }
        })
    }

    fn validate(value: serde_json::Value) -> Result<Report, ValidationError> {
        let request: ReportRequest = serde_json::from_value(value).unwrap();
        request.validate_on(&RenderConfig::default(), today())
    }

    #[test]
    fn test_minimal_payload_is_valid() {
        let report = validate(minimal()).unwrap();
        let identity = report.identity();
        assert_eq!(identity.name(), "Ana María Pérez");
        assert_eq!(identity.age(), None);
        assert_eq!(identity.sex(), None);
        assert_eq!(identity.analysis_date(), "07/03/2024");
        assert!(report.sections().plan.habits.is_empty());
        assert!(report.sections().plan.supplements.is_empty());
    }

    #[test]
    fn test_branding_defaults_come_from_config() {
        let report = validate(minimal()).unwrap();
        let branding = report.branding();
        assert_eq!(branding.contact, "316 709 9568");
        assert_eq!(branding.distributor, "Jair Montilla – VitalHealth Colombia");
        assert!(branding.logo.is_empty());
    }

    #[test]
    fn test_blank_optionals_count_as_absent() {
        let mut payload = minimal();
        payload["paciente_edad"] = json!("  ");
        payload["fecha_analisis"] = json!("");
        payload["branding"] = json!({"logo_base64": ""});

        let report = validate(payload).unwrap();
        assert_eq!(report.identity().age(), None);
        assert_eq!(report.identity().analysis_date(), "07/03/2024");
        assert_eq!(report.branding().contact, "316 709 9568");
        assert_eq!(report.branding().logo.base64, None);
    }

    #[test]
    fn test_explicit_blank_contact_is_kept() {
        let mut payload = minimal();
        payload["branding"] = json!({"whatsapp": "", "distribuidor": ""});

        let report = validate(payload).unwrap();
        assert_eq!(report.branding().contact, "");
        assert_eq!(report.branding().distributor, "");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let mut payload = minimal();
        payload.as_object_mut().unwrap().remove("paciente_nombre");

        let error = validate(payload).unwrap_err();
        assert_eq!(
            error.fields(),
            &[FieldError {
                field: "paciente_nombre".to_string(),
                problem: FieldProblem::Missing,
            }]
        );
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut payload = minimal();
        payload["paciente_nombre"] = json!("   ");

        let error = validate(payload).unwrap_err();
        assert_eq!(error.fields()[0].problem, FieldProblem::Empty);
        assert_eq!(
            error.to_string(),
            "invalid report payload: paciente_nombre is empty"
        );
    }

    #[test]
    fn test_all_missing_fields_are_enumerated() {
        let payload = json!({
            "secciones": {
                "estado_general": "Estable",
                "lo_bueno": "",
                "plan_30d": {"suplementos": [{"nombre": "Zinc"}]}
            }
        });

        let error = validate(payload).unwrap_err();
        assert_eq!(
            error.field_paths(),
            vec![
                "paciente_nombre",
                "secciones.vigilar",
                "secciones.alterado",
                "secciones.como_se_siente",
                "secciones.proyeccion",
                "secciones.seguimiento",
                "secciones.plan_30d.suplementos[0].dosis",
                "secciones.plan_30d.suplementos[0].duracion_dias",
            ]
        );
    }

    #[test]
    fn test_missing_sections() {
        let error = validate(json!({"paciente_nombre": "Ana"})).unwrap_err();
        assert_eq!(error.field_paths(), vec!["secciones"]);
    }

    #[test]
    fn test_missing_plan() {
        let mut payload = minimal();
        payload["secciones"]
            .as_object_mut()
            .unwrap()
            .remove("plan_30d");

        let error = validate(payload).unwrap_err();
        assert_eq!(error.field_paths(), vec!["secciones.plan_30d"]);
    }

    #[test]
    fn test_empty_section_text_is_allowed() {
        let mut payload = minimal();
        payload["secciones"]["vigilar"] = json!("");
        assert!(validate(payload).is_ok());
    }

    #[test]
    fn test_supplement_notes() {
        let mut payload = minimal();
        payload["secciones"]["plan_30d"] = json!({
            "habitos": ["Caminar 30 minutos"],
            "suplementos": [
                {"nombre": "Omega 3", "dosis": "1 cápsula", "duracion_dias": 30, "notas": ""},
                {"nombre": "Magnesio", "dosis": "200 mg", "duracion_dias": 15, "notas": "En la noche"}
            ]
        });

        let report = validate(payload).unwrap();
        let plan = &report.sections().plan;
        assert_eq!(plan.habits, vec!["Caminar 30 minutos".to_string()]);
        assert_eq!(plan.supplements[0].notes, None);
        assert_eq!(plan.supplements[1].notes.as_deref(), Some("En la noche"));
    }

    #[test]
    fn test_validation_error_serializes_fields() {
        let error = validate(json!({"paciente_nombre": ""})).unwrap_err();
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(
            value,
            json!({"fields": [
                {"field": "paciente_nombre", "problem": "empty"},
                {"field": "secciones", "problem": "missing"}
            ]})
        );
    }

    #[test]
    fn test_wrong_type_names_the_field() {
        let mut payload = minimal();
        payload["paciente_nombre"] = json!(5);

        let error = ReportRequest::deserialize_from(payload).unwrap_err();
        assert_eq!(
            error.fields(),
            &[FieldError {
                field: "paciente_nombre".to_string(),
                problem: FieldProblem::InvalidType,
            }]
        );
        assert_eq!(
            error.to_string(),
            "invalid report payload: paciente_nombre has an invalid type"
        );
    }

    #[test]
    fn test_wrong_type_in_nested_supplement() {
        let mut payload = minimal();
        payload["secciones"]["plan_30d"] = json!({
            "suplementos": [
                {"nombre": "Zinc", "dosis": "50 mg", "duracion_dias": 30},
                {"nombre": "Omega 3", "dosis": "1 cápsula", "duracion_dias": "treinta"}
            ]
        });

        let error = ReportRequest::deserialize_from(payload).unwrap_err();
        assert_eq!(
            error.field_paths(),
            vec!["secciones.plan_30d.suplementos[1].duracion_dias"]
        );
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["fields"][0]["problem"], json!("invalid_type"));
    }

    #[test]
    fn test_wrong_root_type() {
        let error = ReportRequest::deserialize_from(json!(42)).unwrap_err();
        assert_eq!(error.field_paths(), vec!["<root>"]);
    }

    #[test]
    fn test_well_typed_payload_deserializes() {
        let request = ReportRequest::deserialize_from(minimal()).unwrap();
        assert_eq!(request.patient_name.as_deref(), Some("Ana María Pérez"));
        assert!(request.validate_on(&RenderConfig::default(), today()).is_ok());
    }
}
