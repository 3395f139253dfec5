use crate::document::Document;
use crate::graphics::Color;
use crate::page::Page;
use crate::report::config::{Palette, RenderConfig};
use crate::report::layout::{Element, Footer, LayoutCanvas, PageGeometry, ReportLayout};
use crate::report::logo::{Logo, LogoFetcher};
use crate::report::model::{PatientIdentity, Report, ReportRequest};
use crate::report::ReportError;
use crate::text::Font;
use tracing::{debug, info};

const LOGO_RESOURCE: &str = "Logo";

/// A finished report, ready to be sent or written to disk.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    /// Suggested download name, safe inside a quoted header parameter
    pub filename: String,
    pub page_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Colors {
    background: Color,
    accent: Color,
    muted: Color,
    body: Color,
    footer: Color,
}

impl Colors {
    fn parse(palette: &Palette) -> Result<Self, ReportError> {
        let parse = |name: &str, hex: &str| {
            Color::from_hex(hex)
                .map_err(|_| ReportError::InvalidConfig(format!("palette.{name}: {hex:?}")))
        };
        Ok(Self {
            background: parse("background", &palette.background)?,
            accent: parse("accent", &palette.accent)?,
            muted: parse("muted", &palette.muted)?,
            body: parse("body", &palette.body)?,
            footer: parse("footer", &palette.footer)?,
        })
    }
}

/// Lays out and renders validated reports. Immutable and cheap to share.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    config: RenderConfig,
    geometry: PageGeometry,
    colors: Colors,
}

impl ReportRenderer {
    /// Fails when a palette entry is not a `#RRGGBB` colour.
    pub fn new(config: RenderConfig) -> Result<Self, ReportError> {
        let colors = Colors::parse(&config.palette)?;
        Ok(Self {
            config,
            geometry: PageGeometry::a4(),
            colors,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Validates, resolves the logo and renders.
    ///
    /// Validation runs first, so an invalid payload never triggers a fetch.
    pub async fn generate<F: LogoFetcher>(
        &self,
        request: ReportRequest,
        fetcher: &F,
    ) -> Result<RenderedReport, ReportError> {
        let report = request.validate(&self.config)?;
        let logo = Logo::resolve(&report.branding().logo, fetcher).await;
        self.render(&report, &logo)
    }

    pub fn render(&self, report: &Report, logo: &Logo) -> Result<RenderedReport, ReportError> {
        let layout = self.layout(report, logo);
        let document = self.paint(report, &layout, logo)?;
        let bytes = document.to_bytes()?;

        info!(
            pages = layout.page_count(),
            size = bytes.len(),
            logo = !logo.is_absent(),
            "Rendered report"
        );

        Ok(RenderedReport {
            bytes,
            filename: report_filename(&self.config.filename_prefix, report.identity()),
            page_count: layout.page_count(),
        })
    }

    /// Positions every element of the report.
    ///
    /// Only one overflow check exists, right before the 30-day plan. Long
    /// sections elsewhere run past the bottom margin.
    pub fn layout(&self, report: &Report, logo: &Logo) -> ReportLayout {
        let config = &self.config;
        let labels = &config.labels;
        let g = self.geometry;
        let colors = self.colors;
        let identity = report.identity();
        let sections = report.sections();
        let branding = report.branding();

        let footer = Footer {
            font: Font::Helvetica,
            size: g.footer_size,
            color: colors.footer,
            lines: vec![
                (
                    g.footer_attribution_y,
                    format!("{} • {}", config.attribution, branding.distributor),
                ),
                (g.footer_disclaimer_y, config.disclaimer.clone()),
            ],
        };
        let mut canvas = LayoutCanvas::new(g, colors.background, footer);

        if logo.image().is_some() {
            let (x, y) = g.logo_origin();
            canvas.draw_image(x, y, g.logo_width, g.logo_height);
        }

        canvas
            .set_fill_color(colors.accent)
            .set_font(Font::HelveticaBold, g.title_size);
        canvas.draw_centred(g.from_top(g.title_top_offset), &config.heading);

        canvas
            .set_fill_color(colors.muted)
            .set_font(Font::Helvetica, g.body_size);
        canvas.draw_centred(g.from_top(g.subtitle_top_offset), &config.subtitle);

        canvas
            .set_fill_color(colors.body)
            .set_font(Font::Helvetica, g.body_size);
        let placeholder = config.placeholder.as_str();
        let identity_line = format!(
            "{}: {}    {}: {}    {}: {}    {}: {}",
            labels.patient,
            identity.name(),
            labels.age,
            identity.age().unwrap_or(placeholder),
            labels.sex,
            identity.sex().unwrap_or(placeholder),
            labels.date,
            identity.analysis_date(),
        );
        canvas.draw_string(g.margin, g.from_top(g.identity_top_offset), &identity_line);

        let mut y = g.from_top(g.body_top_offset);
        for (title, body) in [
            (&labels.general_state, &sections.general_state),
            (&labels.positives, &sections.positives),
            (&labels.watch_items, &sections.watch_items),
            (&labels.abnormal_findings, &sections.abnormal_findings),
            (&labels.current_feeling, &sections.current_feeling),
        ] {
            y = self.section_title(&mut canvas, title, y);
            y = self.paragraph(&mut canvas, body, y);
        }

        if y < g.overflow_threshold {
            debug!(cursor = y, "Plan starts on a new page");
            canvas.show_page();
            y = g.from_top(g.continuation_top_offset);
        }

        let plan = &sections.plan;
        y = self.section_title(&mut canvas, &labels.plan, y);
        y = canvas.draw_wrapped(&labels.habits, g.margin, y, g.paragraph_width(), g.leading);
        for habit in &plan.habits {
            y = self.bullet(&mut canvas, habit, y);
        }
        y -= g.plan_gap;
        y = canvas.draw_wrapped(
            &labels.supplements,
            g.margin,
            y,
            g.paragraph_width(),
            g.leading,
        );
        for supplement in &plan.supplements {
            y = self.bullet(&mut canvas, &supplement.describe(&labels.days), y);
        }

        y = self.section_title(&mut canvas, &labels.projection, y);
        y = self.paragraph(&mut canvas, &sections.projection, y);

        y = self.section_title(&mut canvas, &labels.follow_up, y);
        let follow_up = format!(
            "{}  |  {}: {}",
            sections.follow_up, config.contact_label, branding.contact
        );
        canvas.draw_wrapped(&follow_up, g.margin, y, g.paragraph_width(), g.leading);

        canvas.finish()
    }

    fn section_title(&self, canvas: &mut LayoutCanvas, title: &str, y: f64) -> f64 {
        let g = &self.geometry;
        canvas
            .set_fill_color(self.colors.accent)
            .set_font(Font::HelveticaBold, g.section_title_size);
        canvas.draw_string(g.margin, y, title);
        canvas
            .set_fill_color(self.colors.body)
            .set_font(Font::Helvetica, g.body_size);
        y - g.section_title_advance
    }

    fn paragraph(&self, canvas: &mut LayoutCanvas, text: &str, y: f64) -> f64 {
        let g = &self.geometry;
        canvas.draw_wrapped(text, g.margin, y, g.paragraph_width(), g.leading) - g.paragraph_gap
    }

    fn bullet(&self, canvas: &mut LayoutCanvas, text: &str, y: f64) -> f64 {
        let g = &self.geometry;
        canvas.draw_wrapped(
            &format!("• {text}"),
            g.bullet_x,
            y,
            g.bullet_width(),
            g.leading,
        )
    }

    /// Turns a layout into a PDF document. Graphics (background, logo) are
    /// painted below text on every page.
    pub fn paint(
        &self,
        report: &Report,
        layout: &ReportLayout,
        logo: &Logo,
    ) -> Result<Document, ReportError> {
        let mut document = Document::new();
        document.set_title(format!(
            "{} – {}",
            self.config.heading,
            report.identity().name()
        ));
        document.set_author(report.branding().distributor.clone());
        document.set_subject(self.config.subtitle.clone());
        document.set_creator(self.config.service_title.clone());

        for page_layout in &layout.pages {
            let mut page = Page::new(self.geometry.width, self.geometry.height);

            for element in &page_layout.elements {
                match element {
                    Element::Background(color) => {
                        page.graphics()
                            .set_fill_color(*color)
                            .rect(0.0, 0.0, self.geometry.width, self.geometry.height)
                            .fill();
                    }
                    Element::Image {
                        x,
                        y,
                        width,
                        height,
                    } => {
                        if let Some(image) = logo.image() {
                            page.add_image(LOGO_RESOURCE, image.clone());
                            page.draw_image(LOGO_RESOURCE, *x, *y, *width, *height)?;
                        }
                    }
                    Element::Text(run) => {
                        page.text()
                            .set_font(run.font, run.size)
                            .set_fill_color(run.color)
                            .at(run.x, run.y)
                            .write(&run.text);
                    }
                }
            }

            document.add_page(page);
        }

        Ok(document)
    }
}

/// `{prefix}_{name}_{date}.pdf` with whitespace in the name turned into `_`
/// and `/` in the date turned into `-`. Quotes, backslashes, path separators
/// and control characters become `_`.
pub fn report_filename(prefix: &str, identity: &PatientIdentity) -> String {
    let name: String = identity
        .name()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let date = identity.analysis_date().replace('/', "-");

    format!("{prefix}_{name}_{date}.pdf")
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn report(value: serde_json::Value) -> Report {
        let request: ReportRequest = serde_json::from_value(value).unwrap();
        request
            .validate_on(
                &RenderConfig::default(),
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            )
            .unwrap()
    }

    fn minimal() -> serde_json::Value {
        json!({
            "paciente_nombre": "Ana Pérez",
            "secciones": {
                "estado_general": "Estable",
                "lo_bueno": "Hidratación",
                "vigilar": "Colesterol",
                "alterado": "Ninguno",
                "como_se_siente": "Bien",
                "proyeccion": "Favorable",
                "seguimiento": "Control mensual",
                "plan_30d": {"habitos": [], "suplementos": []}
            }
        })
    }

    #[test]
    fn test_invalid_palette_is_rejected() {
        let mut config = RenderConfig::default();
        config.palette.accent = "green".to_string();
        let error = ReportRenderer::new(config).unwrap_err();
        assert!(matches!(error, ReportError::InvalidConfig(_)));
        assert!(error.to_string().contains("palette.accent"));
    }

    #[test]
    fn test_header_positions() {
        let renderer = ReportRenderer::new(RenderConfig::default()).unwrap();
        let layout = renderer.layout(&report(minimal()), &Logo::Absent);
        let page = &layout.pages[0];

        let heading = page.find_text("ANÁLISIS CUÁNTICO DE SALUD").unwrap();
        assert_eq!(heading.y, 702.0);
        assert_eq!(heading.font, Font::HelveticaBold);
        assert_eq!(heading.size, 16.0);

        let identity = page
            .find_text("Paciente: Ana Pérez    Edad: -    Sexo: -    Fecha: 02/05/2024")
            .unwrap();
        assert_eq!((identity.x, identity.y), (40.0, 657.0));

        let first_title = page.find_text("Estado general").unwrap();
        assert_eq!(first_title.y, 632.0);
        assert_eq!(page.find_text("Estable").map(|r| r.y), Some(616.0));
        assert_eq!(page.find_text("Lo bueno").map(|r| r.y), Some(598.0));
    }

    #[test]
    fn test_section_order() {
        let renderer = ReportRenderer::new(RenderConfig::default()).unwrap();
        let layout = renderer.layout(&report(minimal()), &Logo::Absent);
        let lines = layout.pages[0].lines();
        let position = |text: &str| lines.iter().position(|l| *l == text).unwrap();

        let order = [
            "Estado general",
            "Lo bueno",
            "Lo que hay que vigilar",
            "Lo que está alterado",
            "Cómo se siente actualmente",
            "Plan de acción VitalHealth (30 días)",
            "Hábitos:",
            "Suplementación recomendada:",
            "Proyección de mejora",
            "Seguimiento y contacto",
            "Control mensual | WhatsApp: 316 709 9568",
        ];
        let positions: Vec<usize> = order.iter().map(|&t| position(t)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_plan_gap_and_bullets() {
        let mut payload = minimal();
        payload["secciones"]["plan_30d"] = json!({
            "habitos": ["Caminar"],
            "suplementos": [{"nombre": "Zinc", "dosis": "10 mg", "duracion_dias": 30}]
        });
        let renderer = ReportRenderer::new(RenderConfig::default()).unwrap();
        let layout = renderer.layout(&report(payload), &Logo::Absent);
        let page = &layout.pages[0];

        let habits = page.find_text("Hábitos:").unwrap();
        let habit = page.find_text("• Caminar").unwrap();
        let supplements = page.find_text("Suplementación recomendada:").unwrap();
        let supplement = page.find_text("• Zinc: 10 mg – 30 días").unwrap();

        assert_eq!(habit.x, 55.0);
        assert_eq!(habit.y, habits.y - 14.0);
        assert_eq!(supplements.y, habit.y - 14.0 - 6.0);
        assert_eq!(supplement.y, supplements.y - 14.0);
    }

    #[test]
    fn test_filename() {
        let report = report(minimal());
        assert_eq!(
            report_filename("Informe_Cuantico", report.identity()),
            "Informe_Cuantico_Ana_Pérez_02-05-2024.pdf"
        );
    }

    #[test]
    fn test_filename_strips_header_breaking_characters() {
        let mut payload = minimal();
        payload["paciente_nombre"] = json!("Ana \"La\" Pé\\rez");
        payload["fecha_analisis"] = json!("2024/05/02\r");
        let report = report(payload);
        assert_eq!(
            report_filename("Informe", report.identity()),
            "Informe_Ana__La__Pé_rez_2024-05-02_.pdf"
        );
    }

    #[test]
    fn test_render_produces_pdf() {
        let renderer = ReportRenderer::new(RenderConfig::default()).unwrap();
        let rendered = renderer.render(&report(minimal()), &Logo::Absent).unwrap();

        assert!(rendered.bytes.starts_with(b"%PDF-"));
        assert_eq!(rendered.page_count, 1);
        assert_eq!(rendered.filename, "Informe_Cuantico_Ana_Pérez_02-05-2024.pdf");
    }
}
