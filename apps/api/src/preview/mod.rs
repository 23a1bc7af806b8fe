//! Live Preview Renderer: HTML for the on-screen resume.
//!
//! Draws the same [`ResumeLayout`] as the print renderer with the same
//! [`StyleProfile`], so the preview is what the PDF will look like.

use maud::{html, Markup, DOCTYPE};

use crate::layout::contract::{
    build_layout, EntryView, ResumeLayout, SectionKind, SectionView, EMPTY_STATE_HINT,
    EMPTY_STATE_TITLE,
};
use crate::models::resume::ResumeRecord;
use crate::templates::{palette, profile, StyleProfile, TemplateId};

/// Renders the preview card for `record` under `template`.
pub fn render_preview(record: &ResumeRecord, template: TemplateId) -> Markup {
    render_layout(&build_layout(record), template)
}

pub fn render_layout(layout: &ResumeLayout, template: TemplateId) -> Markup {
    let style = profile(template);
    html! {
        article.resume-preview data-template=(template.as_str()) {
            header.resume-header style=(format!(
                "background:{};color:{};padding:24px", style.header_background.css(), palette::WHITE.css()
            )) {
                h1 style="font-size:30px;font-weight:700;margin:0 0 8px" { (layout.header.name) }
                @for line in &layout.header.contact_lines {
                    p.contact style="margin:4px 0;opacity:0.9" { (line) }
                }
            }
            div.resume-body style="padding:24px" {
                @for section in &layout.sections {
                    (section_markup(section, &style))
                }
                @if layout.empty_state {
                    (empty_state())
                }
            }
        }
    }
}

/// A standalone page around the preview card.
pub fn render_preview_page(record: &ResumeRecord, template: TemplateId) -> Markup {
    let title = if record.personal_info.full_name.is_empty() {
        "Resume preview".to_string()
    } else {
        format!("{} - Resume preview", record.personal_info.full_name)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body style="font-family:Helvetica,Arial,sans-serif;background:#f8fafc;margin:0;padding:32px" {
                div style="max-width:794px;margin:0 auto;background:#fff;box-shadow:0 10px 30px rgba(15,23,42,.15)" {
                    (render_preview(record, template))
                }
            }
        }
    }
}

fn empty_state() -> Markup {
    html! {
        div.empty-state data-empty-state style=(format!(
            "text-align:center;padding:48px 0;color:{}", palette::MUTED.css()
        )) {
            p style="font-size:18px;margin:0 0 4px" { (EMPTY_STATE_TITLE) }
            p style="font-size:14px;margin:0" { (EMPTY_STATE_HINT) }
        }
    }
}

fn section_markup(section: &SectionView, style: &StyleProfile) -> Markup {
    let kind = section.kind();
    html! {
        section.resume-section data-section=(kind.slug()) style="margin-bottom:24px" {
            (section_title(kind, style))
            @match section {
                SectionView::Summary(text) => {
                    p style=(format!("color:{};line-height:1.6;margin:0", palette::BODY.css())) { (text) }
                }
                SectionView::Experience(entries) | SectionView::Education(entries) => {
                    @for entry in entries {
                        (entry_markup(entry, style))
                    }
                }
                SectionView::Skills(skills) => {
                    div.skills style="display:flex;flex-wrap:wrap;gap:8px" {
                        @for skill in skills {
                            span.skill data-badge style=(format!(
                                "background:{};color:{};padding:4px 12px;border-radius:9999px;font-size:14px;font-weight:500",
                                style.skill_badge_background.css(), palette::WHITE.css()
                            )) { (skill) }
                        }
                    }
                }
            }
        }
    }
}

fn section_title(kind: SectionKind, style: &StyleProfile) -> Markup {
    html! {
        h2 style=(format!(
            "font-size:20px;font-weight:700;color:{};margin:0 0 12px;padding-bottom:4px;border-bottom:2px solid {}",
            palette::INK.css(), style.accent_color.css()
        )) { (kind.title()) }
    }
}

fn entry_markup(entry: &EntryView, style: &StyleProfile) -> Markup {
    html! {
        div.entry style="padding-bottom:16px" {
            div style="display:flex;justify-content:space-between;align-items:flex-start;margin-bottom:8px" {
                div {
                    h3 style=(format!("font-weight:600;color:{};margin:0", palette::INK.css())) { (entry.heading) }
                    p style=(format!("font-weight:500;color:{};margin:0", style.accent_color.css())) { (entry.subheading) }
                }
                span.pill style=(format!(
                    "font-size:14px;color:{};background:{};padding:4px 8px;border-radius:4px",
                    palette::MUTED.css(), palette::PILL.css()
                )) { (entry.badge) }
            }
            @if let Some(detail) = &entry.detail {
                p style=(format!("color:{};font-size:14px;line-height:1.6;margin:0", palette::BODY.css())) { (detail) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::print::render_print;
    use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo};

    fn count(html: &str, needle: &str) -> usize {
        html.matches(needle).count()
    }

    /// `data-section` slugs in document order.
    fn preview_sections(html: &str) -> Vec<String> {
        html.split("data-section=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect()
    }

    fn personal(info: PersonalInfo) -> ResumeRecord {
        ResumeRecord {
            personal_info: info,
            ..Default::default()
        }
    }

    fn sample_records() -> Vec<ResumeRecord> {
        let full = ResumeRecord {
            personal_info: PersonalInfo {
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+1 555 0100".to_string(),
                location: "Lisbon".to_string(),
                summary: "Backend engineer.".to_string(),
            },
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                duration: "2020 - Present".to_string(),
                description: "Built the billing pipeline.".to_string(),
            }],
            education: vec![EducationEntry::default()],
            skills: vec!["Rust".to_string(), "SQL".to_string()],
        };
        let mut long = full.clone();
        long.experience = (0..30)
            .map(|i| ExperienceEntry {
                company: format!("Company {i}"),
                description: "Shipped features and fixed bugs across the stack. ".repeat(4),
                ..Default::default()
            })
            .collect();

        vec![
            ResumeRecord::default(),
            personal(PersonalInfo {
                email: "a@b.c".to_string(),
                location: "Berlin".to_string(),
                ..Default::default()
            }),
            personal(PersonalInfo {
                summary: "Engineer".to_string(),
                ..Default::default()
            }),
            ResumeRecord {
                skills: vec!["SQL".to_string()],
                ..Default::default()
            },
            ResumeRecord {
                personal_info: PersonalInfo {
                    summary: "Engineer".to_string(),
                    ..Default::default()
                },
                education: vec![EducationEntry {
                    school: "MIT".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            },
            full,
            long,
        ]
    }

    #[test]
    fn test_preview_and_print_agree_on_sections() {
        for record in sample_records() {
            let layout = build_layout(&record);
            let expected: Vec<&str> = layout.section_kinds().iter().map(|k| k.slug()).collect();

            for template in TemplateId::ALL {
                let html = render_preview(&record, template).into_string();
                let print = render_print(&record, template);
                let printed = print.section_kinds();
                let printed: Vec<&str> = printed.iter().map(|k| k.slug()).collect();

                assert_eq!(preview_sections(&html), expected, "{template} preview: {record:?}");
                assert_eq!(printed, expected, "{template} print: {record:?}");

                assert_eq!(count(&html, "data-empty-state"), usize::from(layout.empty_state));
                if layout.empty_state {
                    assert!(printed.iter().all(|slug| *slug == "summary"));
                }
                let info = &record.personal_info;
                if info.full_name.is_empty() && info.summary.is_empty() {
                    assert_eq!(layout.empty_state, printed.is_empty(), "{record:?}");
                }
            }
        }
    }

    #[test]
    fn test_contact_only_record_shows_empty_state() {
        let record = personal(PersonalInfo {
            email: "a@b.c".to_string(),
            ..Default::default()
        });
        let html = render_preview(&record, TemplateId::Modern).into_string();
        assert_eq!(count(&html, "data-empty-state"), 1);
        assert_eq!(count(&html, "data-section="), 0);
        assert!(html.contains(">a@b.c</p>"));
    }

    #[test]
    fn test_summary_only_shows_summary_above_empty_state() {
        let record = personal(PersonalInfo {
            summary: "Engineer".to_string(),
            ..Default::default()
        });
        let html = render_preview(&record, TemplateId::Modern).into_string();
        assert_eq!(preview_sections(&html), vec!["summary"]);
        let section = html.find("data-section").unwrap();
        let placeholder = html.find("data-empty-state").unwrap();
        assert!(section < placeholder);
    }

    #[test]
    fn test_fresh_record_shows_single_empty_state() {
        let html = render_preview(&ResumeRecord::default(), TemplateId::Modern).into_string();
        assert_eq!(count(&html, "data-empty-state"), 1);
        assert_eq!(count(&html, "data-section="), 0);
        assert!(html.contains("Your Name"));
    }

    #[test]
    fn test_skills_only_renders_one_section_one_badge() {
        let record = ResumeRecord {
            skills: vec!["SQL".to_string()],
            ..Default::default()
        };
        let html = render_preview(&record, TemplateId::Modern).into_string();
        assert_eq!(count(&html, "data-section="), 1);
        assert_eq!(count(&html, "data-section=\"skills\""), 1);
        assert_eq!(count(&html, "data-badge"), 1);
        assert!(html.contains(">SQL</span>"));
        assert_eq!(count(&html, "data-empty-state"), 0);
    }

    #[test]
    fn test_uses_template_colors() {
        let record = ResumeRecord {
            skills: vec!["Go".to_string()],
            ..Default::default()
        };
        let style = profile(TemplateId::Elegant);
        let html = render_preview(&record, TemplateId::Elegant).into_string();
        assert!(html.contains(&format!("background:{}", style.header_background.css())));
        assert!(html.contains(&format!("border-bottom:2px solid {}", style.accent_color.css())));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let record = ResumeRecord {
            personal_info: PersonalInfo {
                full_name: "<script>alert(1)</script>".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let html = render_preview(&record, TemplateId::Modern).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_description_omitted_when_blank() {
        let record = ResumeRecord {
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let html = render_preview(&record, TemplateId::Creative).into_string();
        assert!(html.contains("Position Title"));
        assert!(html.contains(">Acme</p>"));
        assert!(html.contains("Duration"));
        assert_eq!(count(&html, "line-height:1.6"), 0);
    }

    #[test]
    fn test_preview_page_is_full_document() {
        let html = render_preview_page(&ResumeRecord::default(), TemplateId::Modern).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Resume preview</title>"));
    }
}
