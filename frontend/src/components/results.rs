use shared::{Confidence, Edibility, Plant, Severity, Toxicity};
use yew::prelude::*;

const EMPTY_TAGS: &str = "Não informado";

pub fn confidence_label(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "Alta",
        Confidence::Medium => "Média",
        Confidence::Low => "Baixa",
    }
}

pub fn confidence_class(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "badge-ok",
        Confidence::Medium => "badge-warn",
        Confidence::Low => "badge-alert",
    }
}

pub fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::None => "Nenhuma",
        Severity::Mild => "Leve",
        Severity::Moderate => "Moderada",
        Severity::Severe => "Severa",
        Severity::Fatal => "Fatal",
    }
}

pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::None => "badge-ok",
        Severity::Mild => "badge-warn",
        Severity::Moderate => "badge-alert",
        Severity::Severe => "badge-danger",
        Severity::Fatal => "badge-fatal",
    }
}

/// Detail lists are shown only for plants flagged as toxic.
pub fn show_toxicity_details(toxicity: &Toxicity) -> bool {
    toxicity.is_toxic
}

/// Edible parts and preparation are shown only for edible plants.
pub fn show_edibility_details(edibility: &Edibility) -> bool {
    edibility.is_edible
}

/// Warnings are shown whenever present, edible or not.
pub fn show_warnings(edibility: &Edibility) -> bool {
    !edibility.warnings.is_empty()
}

fn badge(text: String, class: &'static str) -> Html {
    html! { <span class={classes!("badge", class)}>{ text }</span> }
}

fn tag_list(items: &[String], empty_text: &str) -> Html {
    if items.is_empty() {
        return html! { <p class="tags-empty">{ empty_text }</p> };
    }
    html! {
        <div class="tag-list">
            { for items.iter().map(|item| html! {
                <span class="tag">{ item }</span>
            })}
        </div>
    }
}

fn labeled(label: &str, body: Html) -> Html {
    html! {
        <div class="field">
            <p class="field-label">{ label }</p>
            { body }
        </div>
    }
}

pub fn render_plant(plant: &Plant) -> Html {
    if plant.not_a_plant {
        return render_not_a_plant();
    }

    html! {
        <div class="plant-result">
            { render_identity(plant) }
            { render_toxicity(&plant.toxicity) }
            { render_edibility(&plant.edibility) }
        </div>
    }
}

fn render_not_a_plant() -> Html {
    html! {
        <div class="result-card not-a-plant">
            <span class="card-icon">{"🔍"}</span>
            <p class="not-a-plant-title">{"Nenhuma planta identificada na imagem."}</p>
            <p class="not-a-plant-hint">{"Envie uma foto de uma planta, flor, árvore ou fungo."}</p>
        </div>
    }
}

fn render_identity(plant: &Plant) -> Html {
    html! {
        <div class="result-card identity">
            <div class="identity-header">
                <div>
                    <h2>{ &plant.name.common }</h2>
                    <p class="scientific-name">{ &plant.name.scientific }</p>
                    <p class="family-name">{ &plant.name.family }</p>
                </div>
                { badge(
                    format!("Confiança: {}", confidence_label(plant.confidence)),
                    confidence_class(plant.confidence),
                )}
            </div>
            <p class="description">{ &plant.description }</p>
        </div>
    }
}

fn render_toxicity(toxicity: &Toxicity) -> Html {
    let toxic_badge = if toxicity.is_toxic {
        badge("Tóxica".to_string(), "badge-danger")
    } else {
        badge("Não tóxica".to_string(), "badge-ok")
    };

    html! {
        <div class="result-card">
            <h3>{"⚠️ Toxicidade"}</h3>
            <div class="badge-row">
                { toxic_badge }
                { badge(
                    format!("Gravidade: {}", severity_label(toxicity.severity)),
                    severity_class(toxicity.severity),
                )}
            </div>
            {
                if show_toxicity_details(toxicity) {
                    html! {
                        <>
                            { labeled("Afeta", tag_list(&toxicity.toxic_to, EMPTY_TAGS)) }
                            { labeled("Partes perigosas", tag_list(&toxicity.dangerous_parts, EMPTY_TAGS)) }
                            { labeled("Sintomas", tag_list(&toxicity.symptoms, "Nenhum sintoma listado")) }
                        </>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn render_edibility(edibility: &Edibility) -> Html {
    let edible_badge = if edibility.is_edible {
        badge("Comestível".to_string(), "badge-ok")
    } else {
        badge("Não comestível".to_string(), "badge-danger")
    };

    html! {
        <div class="result-card">
            <h3>{"🍽️ Comestibilidade"}</h3>
            <div class="badge-row">{ edible_badge }</div>
            {
                if show_edibility_details(edibility) {
                    html! {
                        <>
                            { labeled("Partes comestíveis", tag_list(&edibility.edible_parts, EMPTY_TAGS)) }
                            {
                                if edibility.preparation.is_empty() {
                                    html! {}
                                } else {
                                    labeled("Como preparar", html! {
                                        <p class="preparation">{ &edibility.preparation }</p>
                                    })
                                }
                            }
                        </>
                    }
                } else {
                    html! {}
                }
            }
            {
                if show_warnings(edibility) {
                    labeled("Avisos", html! {
                        <ul class="warnings">
                            { for edibility.warnings.iter().map(|warning| html! {
                                <li>{ warning }</li>
                            })}
                        </ul>
                    })
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toxicity(is_toxic: bool) -> Toxicity {
        Toxicity {
            is_toxic,
            toxic_to: vec!["humanos".into()],
            dangerous_parts: vec![],
            symptoms: vec![],
            severity: if is_toxic { Severity::Moderate } else { Severity::None },
        }
    }

    fn edibility(is_edible: bool, warnings: Vec<String>) -> Edibility {
        Edibility {
            is_edible,
            edible_parts: vec!["frutos".into()],
            preparation: String::new(),
            warnings,
        }
    }

    #[test]
    fn toxicity_details_follow_the_toxic_flag() {
        assert!(show_toxicity_details(&toxicity(true)));
        assert!(!show_toxicity_details(&toxicity(false)));
    }

    #[test]
    fn edibility_details_follow_the_edible_flag() {
        assert!(show_edibility_details(&edibility(true, vec![])));
        assert!(!show_edibility_details(&edibility(false, vec![])));
    }

    #[test]
    fn warnings_show_regardless_of_edibility() {
        assert!(show_warnings(&edibility(false, vec!["cru é tóxico".into()])));
        assert!(show_warnings(&edibility(true, vec!["cru é tóxico".into()])));
        assert!(!show_warnings(&edibility(true, vec![])));
    }

    #[test]
    fn every_confidence_value_has_a_label() {
        assert_eq!(confidence_label(Confidence::High), "Alta");
        assert_eq!(confidence_label(Confidence::Medium), "Média");
        assert_eq!(confidence_label(Confidence::Low), "Baixa");
    }

    #[test]
    fn every_severity_value_has_a_label() {
        for (severity, label) in [
            (Severity::None, "Nenhuma"),
            (Severity::Mild, "Leve"),
            (Severity::Moderate, "Moderada"),
            (Severity::Severe, "Severa"),
            (Severity::Fatal, "Fatal"),
        ] {
            assert_eq!(severity_label(severity), label);
        }
    }
}
