use leptos::*;

use crate::app::query_param;
use crate::supabase::{self, Client, Lookup, QueryError};
use crate::types::{self, Supplement};

const BACKDROPS: [&str; 2] = ["images/MuscleMAn.png", "images/muscleGirl.png"];

#[derive(Clone, Debug, PartialEq)]
enum PageState {
    Connecting,
    Loading,
    Ready(Supplement),
    Failed(String),
}

#[component]
pub fn SupplementPage(client: ReadSignal<Option<Client>>) -> impl IntoView {
    let (state, set_state) = create_signal(PageState::Connecting);

    let begin_load = move |client: Client| {
        set_state.set(PageState::Loading);
        spawn_local(async move {
            let lookup = Lookup::from_params(
                query_param("id"),
                query_param("slug"),
                query_param("name"),
            );
            match resolve(&client, &lookup).await {
                Ok(supplement) => {
                    apply_page_metadata(&supplement);
                    set_state.set(PageState::Ready(supplement));
                }
                Err(error) => {
                    web_sys::console::log_1(
                        &format!("Supplement load failed: {}", error).into(),
                    );
                    set_state.set(PageState::Failed(failure_message(&lookup, &error)));
                }
            }
        });
    };

    supabase::when_ready(client, begin_load, move || {
        set_state.set(PageState::Failed("Database connection failed".to_string()));
    });

    view! {
        <div class="wiki-content">
            {move || match state.get() {
                PageState::Connecting | PageState::Loading => {
                    view! { <div class="loading">"Loading supplement data..."</div> }.into_view()
                }
                PageState::Failed(message) => error_panel(message).into_view(),
                PageState::Ready(supplement) => view! {
                    <div class="wiki-layout">
                        {info_box(&supplement)}
                        <div class="wiki-main">
                            {overview_section(&supplement)}
                            {benefits_section(&supplement)}
                            {research_section(&supplement)}
                            {dosage_section(&supplement)}
                            {safety_section(&supplement)}
                            {combinations_section(&supplement)}
                            {references_section(&supplement)}
                        </div>
                    </div>
                }
                .into_view(),
            }}
        </div>
    }
}

async fn resolve(client: &Client, lookup: &Lookup) -> Result<Supplement, QueryError> {
    match lookup {
        Lookup::Id(id) => client.fetch_by_id(*id).await,
        Lookup::Name(name) => client.fetch_by_name(name).await,
        Lookup::First => client.fetch_first().await,
    }
}

fn failure_message(lookup: &Lookup, error: &QueryError) -> String {
    match (lookup, error) {
        (Lookup::Id(id), QueryError::NotFound) => format!("Supplement with id {} not found", id),
        (Lookup::Name(name), QueryError::NotFound) => {
            format!("Supplement \"{}\" not found", name)
        }
        (Lookup::First, QueryError::NotFound) => "No supplement data available".to_string(),
        _ => "Failed to load supplement data".to_string(),
    }
}

/// Page title and a random backdrop, applied once per successful load.
fn apply_page_metadata(supplement: &Supplement) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    document.set_title(&supplement.page_title());

    let pick = if js_sys::Math::random() < 0.5 { 0 } else { 1 };
    if let Some(body) = document.body() {
        let _ = body
            .style()
            .set_property("background-image", &format!("url({})", BACKDROPS[pick]));
    }
}

fn error_panel(message: String) -> impl IntoView {
    view! {
        <div class="wiki-section error-panel">
            <h3>"⚠️ " {message}</h3>
            <p>"Unable to load supplement information."</p>
            <p><a href="./" class="button">"← Return to Home"</a></p>
        </div>
    }
}

fn no_data(line: &'static str) -> View {
    view! { <p class="no-data">{line}</p> }.into_view()
}

fn info_box(supplement: &Supplement) -> impl IntoView {
    let name = supplement.name.clone();
    let rows = types::info_rows(supplement);

    view! {
        <aside class="info-box">
            <div class="info-box-header"><h4>{name}</h4></div>
            <div class="info-box-content">
                {rows.into_iter().map(|row| {
                    let class = if row.class.is_empty() {
                        "info-value".to_string()
                    } else {
                        format!("info-value {}", row.class)
                    };
                    view! {
                        <div class="info-row">
                            <div class="info-label">{row.label}</div>
                            <div class=class>{row.value}</div>
                        </div>
                    }
                }).collect_view()}
            </div>
        </aside>
    }
}

fn overview_section(supplement: &Supplement) -> impl IntoView {
    let text = supplement.overview_text().to_string();
    let mechanism =
        types::decode_records::<types::MechanismEntry>(supplement.mechanism.as_ref());

    view! {
        <section id="overview" class="wiki-section">
            <h3>"Overview"</h3>
            <p>{text}</p>
            {mechanism.filter(|entries| !entries.is_empty()).map(|entries| view! {
                <h4>"How It Works:"</h4>
                <ul>
                    {entries.into_iter().flat_map(|entry| {
                        entry.into_iter().map(|(heading, detail)| {
                            let detail = types::value_text(&detail);
                            view! { <li><strong>{heading} ": "</strong> {detail}</li> }
                        }).collect::<Vec<_>>()
                    }).collect_view()}
                </ul>
            })}
        </section>
    }
}

fn benefits_section(supplement: &Supplement) -> impl IntoView {
    let benefits = types::decode_records::<types::Benefit>(supplement.benefits.as_ref());

    view! {
        <section id="benefits" class="wiki-section">
            <h3>"Proven Benefits"</h3>
            <div class="studies-grid">
                {match benefits {
                    Some(benefits) if !benefits.is_empty() => benefits.into_iter().map(|b| {
                        let title = b.title.unwrap_or_else(|| "Benefit".to_string());
                        let confidence =
                            b.confidence.unwrap_or_else(|| "Evidence Available".to_string());
                        let description = b
                            .description
                            .unwrap_or_else(|| "No description available.".to_string());
                        let effect = b
                            .effect_size
                            .unwrap_or_else(|| "Variable effects observed".to_string());
                        view! {
                            <div class="study-card">
                                <div class="study-title">{title}</div>
                                <div class="study-meta">{confidence}</div>
                                <p>{description}</p>
                                <div class="study-result">
                                    <strong>"Effect Size: "</strong> {effect}
                                </div>
                            </div>
                        }
                    }).collect_view(),
                    _ => no_data("No benefit data available."),
                }}
            </div>
        </section>
    }
}

fn research_section(supplement: &Supplement) -> impl IntoView {
    let studies = types::decode_records::<types::Study>(supplement.key_studies.as_ref());

    view! {
        <section id="research" class="wiki-section">
            <h3>"Key Studies"</h3>
            <div class="studies-grid">
                {match studies {
                    Some(studies) if !studies.is_empty() => studies.into_iter().map(|study| {
                        let title =
                            study.title.unwrap_or_else(|| "Research Study".to_string());
                        let authors = study
                            .authors
                            .unwrap_or_else(|| "Authors not specified".to_string());
                        let description = study
                            .description
                            .unwrap_or_else(|| "Study details not available.".to_string());
                        view! {
                            <div class="study-card">
                                <div class="study-title">{format!("\"{}\"", title)}</div>
                                <div class="study-meta">{authors}</div>
                                <p>{description}</p>
                                <div class="study-result">
                                    <strong>"Findings: "</strong> "Positive outcomes observed"
                                </div>
                            </div>
                        }
                    }).collect_view(),
                    _ => no_data("No study data available."),
                }}
            </div>
        </section>
    }
}

fn dosage_section(supplement: &Supplement) -> impl IntoView {
    let rows = types::decode_records::<types::DosageRow>(supplement.dosage_table.as_ref());
    let standard_dose = supplement.standard_dose.clone();

    view! {
        <section id="dosage" class="wiki-section">
            <h3>"Dosage Protocols"</h3>
            {match rows {
                Some(rows) if !rows.is_empty() => view! {
                    <table class="dosage-table">
                        <thead>
                            <tr>
                                <th>"Protocol"</th>
                                <th>"Dosage"</th>
                                <th>"Duration"</th>
                                <th>"Notes"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {rows.into_iter().map(|row| {
                                let dosage = row.dosage_or(standard_dose.as_deref()).to_string();
                                let protocol =
                                    row.protocol.unwrap_or_else(|| "Standard".to_string());
                                let duration =
                                    row.duration.unwrap_or_else(|| "Ongoing".to_string());
                                let notes = row.notes.unwrap_or_default();
                                view! {
                                    <tr>
                                        <td><strong>{protocol}</strong></td>
                                        <td>{dosage}</td>
                                        <td>{duration}</td>
                                        <td>{notes}</td>
                                    </tr>
                                }
                            }).collect_view()}
                        </tbody>
                    </table>
                }
                .into_view(),
                _ => no_data("No dosage data available."),
            }}
        </section>
    }
}

fn safety_section(supplement: &Supplement) -> impl IntoView {
    let notes = types::decode_records::<types::SafetyNote>(supplement.safety_notes.as_ref());

    view! {
        <section id="safety" class="wiki-section">
            <h3>"Safety Profile"</h3>
            {match notes {
                Some(notes) if !notes.is_empty() => view! {
                    <h4>"Safety Considerations:"</h4>
                    <ul>
                        {notes.iter().map(|note| {
                            view! { <li>{note.text().to_string()}</li> }
                        }).collect_view()}
                    </ul>
                }
                .into_view(),
                _ => no_data("No safety data available."),
            }}
        </section>
    }
}

fn combinations_section(supplement: &Supplement) -> impl IntoView {
    let name = supplement.name.clone();
    let combos = types::decode_records::<types::Combination>(supplement.combinations.as_ref());

    view! {
        <section id="combinations" class="wiki-section">
            <h3>"Stacking & Combinations"</h3>
            <div class="studies-grid">
                {match combos {
                    Some(combos) if !combos.is_empty() => combos.into_iter().map(|combo| {
                        let partner =
                            combo.combo.unwrap_or_else(|| "Other Supplement".to_string());
                        let meta = combo
                            .effect
                            .clone()
                            .unwrap_or_else(|| "Supplement Combination".to_string());
                        let interaction = combo
                            .effect
                            .unwrap_or_else(|| "Generally safe to combine".to_string());
                        let body = format!(
                            "Combining {} with {} may provide enhanced benefits.",
                            name, partner
                        );
                        view! {
                            <div class="study-card">
                                <div class="study-title">{format!("{} + {}", name, partner)}</div>
                                <div class="study-meta">{meta}</div>
                                <p>{body}</p>
                                <div class="study-result">
                                    <strong>"Interaction: "</strong> {interaction}
                                </div>
                            </div>
                        }
                    }).collect_view(),
                    _ => no_data("No combination data available."),
                }}
            </div>
        </section>
    }
}

fn references_section(supplement: &Supplement) -> impl IntoView {
    let references = types::decode_records::<types::Reference>(supplement.references.as_ref());

    view! {
        <section id="references" class="wiki-section">
            <h3>"References"</h3>
            <div class="reference-list">
                {match references {
                    Some(references) if !references.is_empty() => view! {
                        <ol>
                            {references.iter().map(|reference| {
                                view! { <li>{reference.citation().to_string()}</li> }
                            }).collect_view()}
                        </ol>
                    }
                    .into_view(),
                    _ => no_data("No reference data available."),
                }}
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_carry_the_attempted_identifier() {
        let message = failure_message(&Lookup::Id(5), &QueryError::NotFound);
        assert!(message.contains("not found"), "{message}");
        assert!(message.contains('5'), "{message}");

        let message =
            failure_message(&Lookup::Name("Fish Oil".to_string()), &QueryError::NotFound);
        assert!(message.contains("Fish Oil"), "{message}");
        assert!(message.contains("not found"), "{message}");
    }

    #[test]
    fn other_failures_use_the_generic_message() {
        let message = failure_message(&Lookup::Id(5), &QueryError::Http(500));
        assert_eq!(message, "Failed to load supplement data");

        let message = failure_message(&Lookup::First, &QueryError::NotFound);
        assert_eq!(message, "No supplement data available");
    }
}
