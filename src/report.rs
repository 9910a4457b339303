use crate::formatter::{Document, fmt_load, fmt_percentage};
use maud::{DOCTYPE, Markup, html};
use std::path::Path;

pub fn export_html_report<P: AsRef<Path>>(path: P, doc: &Document) -> std::io::Result<()> {
    std::fs::write(path, build_html(doc).into_string())
}

pub fn build_html(doc: &Document) -> Markup {
    let load = |v: f64| fmt_load(v, doc.precision, doc.unit);
    html! {
        (DOCTYPE)
        html {
            head { meta charset="utf-8"; title { (doc.title) } }
            body {
                h1 { (doc.title) }
                h2 { "Weights" }
                table border="1" {
                    tr { th { "Lift" } th { "Max" } th { "Training Max" } }
                    @for w in &doc.weights {
                        tr {
                            td {
                                (w.name)
                                @if let Some(a) = &w.annotation { " (" (a) ")" }
                            }
                            td { (load(w.load)) }
                            td { (w.training_max.map(load).unwrap_or_else(|| "-".into())) }
                        }
                    }
                }
                @if let Some(r) = &doc.reductions {
                    h2 { "Reductions" }
                    ul {
                        li { "Medium Reduction - " (fmt_percentage(r.medium)) }
                        li { "Light Reduction - " (fmt_percentage(r.light)) }
                    }
                }
                @if let Some(text) = doc.accessories.as_deref().filter(|t| !t.is_empty()) {
                    h2 { "Accessories" }
                    ul {
                        @for line in text.split('\n') { li { (line) } }
                    }
                }
                @for day in doc.schedule.days() {
                    h3 { (day.label) }
                    ul {
                        @for entry in &day.entries { li { (entry) } }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::five_three_one::{FiveThreeOneInputs, assemble_531};
    use crate::hlm::{HlmInputs, Reductions, StandardInputs, assemble_hlm};
    use crate::lifts::{LiftMaxSet, WeightUnit};

    #[test]
    fn build_html_renders_hlm_blocks() {
        let inputs = HlmInputs::Standard(StandardInputs {
            squat: 120.0,
            press: 60.0,
            pull: 160.0,
            reductions: Reductions::default(),
            header_text: Some("Chins <3x8>".into()),
            unit: WeightUnit::Kg,
        });
        let doc = assemble_hlm(&inputs).unwrap().document();
        let output = build_html(&doc).into_string();

        assert!(output.contains("<h1>HLM: HLM Standard 5s</h1>"));
        assert!(output.contains("<td>Squat (5s)</td><td>120.0 kg</td><td>-</td>"));
        assert!(output.contains("Medium Reduction - 10.0%"));
        assert!(output.contains("<li>Chins &lt;3x8&gt;</li>"));
        assert!(output.contains("<h3>Wed</h3>"));
    }

    #[test]
    fn blank_accessory_lines_are_kept() {
        let inputs = FiveThreeOneInputs {
            header_text: Some("Chins\n\nDips".into()),
            ..FiveThreeOneInputs::new(LiftMaxSet::new(225.0, 185.0, 275.0, 115.0), 90.0, 1)
        };
        let doc = assemble_531(&inputs).unwrap().document();
        let output = build_html(&doc).into_string();
        assert!(output.contains("<li>Chins</li><li></li><li>Dips</li>"));
    }

    #[test]
    fn build_html_omits_reductions_for_531() {
        let inputs = FiveThreeOneInputs::new(LiftMaxSet::new(225.0, 185.0, 275.0, 115.0), 90.0, 1);
        let doc = assemble_531(&inputs).unwrap().document();
        let output = build_html(&doc).into_string();

        assert!(!output.contains("Reductions"));
        assert!(!output.contains("<h2>Accessories</h2>"));
        assert!(output.contains("<td>225 lb</td><td>203 lb</td>"));
    }

    #[test]
    fn report_file_is_written() {
        let inputs = FiveThreeOneInputs::new(LiftMaxSet::new(225.0, 185.0, 275.0, 115.0), 90.0, 1);
        let doc = assemble_531(&inputs).unwrap().document();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program.html");
        export_html_report(&path, &doc).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
