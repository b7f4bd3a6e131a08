use leptos::*;

use crate::catalog::{self, Category};
use crate::supabase::{self, Client, QueryError};
use crate::types::Supplement;

const EMPTY_RESULT_MESSAGE: &str =
    "No supplements found. Database may need Row Level Security configuration for public access.";

fn listing_error_message(error: &QueryError) -> &'static str {
    match error {
        QueryError::PermissionDenied => {
            "Database access denied. Please contact the administrator to configure public read access."
        }
        QueryError::AuthFailed => "Database authentication failed. Please check configuration.",
        _ => "Failed to load supplements from database. Please check your internet connection.",
    }
}

#[derive(Clone, Debug, PartialEq)]
enum LoadState {
    Connecting,
    Loading,
    Ready,
    Failed(String),
}

/// Deferred smooth scroll so the target exists by the time it runs.
fn scroll_to(node: NodeRef<html::Section>) {
    gloo_timers::callback::Timeout::new(50, move || {
        if let Some(el) = node.get_untracked() {
            el.scroll_into_view();
        }
    })
    .forget();
}

#[component]
pub fn HomePage(client: ReadSignal<Option<Client>>) -> impl IntoView {
    let (load_state, set_load_state) = create_signal(LoadState::Connecting);
    let supplements = create_rw_signal(Vec::<Supplement>::new());
    let active_category = create_rw_signal(Option::<Category>::None);
    let spotlight = create_rw_signal(Option::<Supplement>::None);
    let (search_query, set_search_query) = create_signal(String::new());
    let (dropdown_open, set_dropdown_open) = create_signal(false);

    let spotlight_ref = create_node_ref::<html::Section>();
    let specific_ref = create_node_ref::<html::Section>();

    let begin_load = move |client: Client| {
        set_load_state.set(LoadState::Loading);
        spawn_local(async move {
            // Let the page paint before the fetch kicks off.
            gloo_timers::future::TimeoutFuture::new(100).await;

            match client.fetch_all().await {
                Ok(rows) if rows.is_empty() => {
                    web_sys::console::log_1(&"Supplement fetch returned zero rows".into());
                    set_load_state.set(LoadState::Failed(EMPTY_RESULT_MESSAGE.to_string()));
                }
                Ok(rows) => {
                    web_sys::console::log_1(
                        &format!("Loaded {} supplements", rows.len()).into(),
                    );
                    supplements.set(rows);
                    set_load_state.set(LoadState::Ready);
                }
                Err(error) => {
                    web_sys::console::log_1(
                        &format!("Supplement fetch failed: {}", error).into(),
                    );
                    set_load_state
                        .set(LoadState::Failed(listing_error_message(&error).to_string()));
                }
            }
        });
    };

    supabase::when_ready(client, begin_load, move || {
        web_sys::console::log_1(&"Database connection failed for landing page".into());
        set_load_state.set(LoadState::Failed("Database connection failed".to_string()));
    });

    let groups = create_memo(move |_| catalog::group_by_category(&supplements.get()));
    let suggestions = create_memo(move |_| {
        catalog::search_suggestions(&supplements.get(), &search_query.get())
    });

    let show_spotlight = move |supplement: Supplement| {
        spotlight.set(Some(supplement));
        scroll_to(spotlight_ref);
    };

    let select_suggestion = move |supplement: Supplement| {
        set_search_query.set(supplement.name.clone());
        set_dropdown_open.set(false);
        show_spotlight(supplement);
    };

    let select_category = move |category: Category| {
        active_category.set(Some(category));
        scroll_to(specific_ref);
    };

    view! {
        <div class="landing">
            <header class="intro">
                <h1>"WhatSupp"</h1>
                <p>"Evidence-based supplement information"</p>
            </header>

            <section class="search-section">
                <input
                    id="search"
                    type="search"
                    placeholder="Search supplements..."
                    autocomplete="off"
                    prop:value=search_query
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        set_dropdown_open.set(!value.trim().is_empty());
                        set_search_query.set(value);
                    }
                />
                {move || {
                    let hits = suggestions.get();
                    (dropdown_open.get() && !hits.is_empty()).then(|| view! {
                        <div id="search-dropdown" class="search-dropdown">
                            {hits.into_iter().map(|supplement| {
                                let category = catalog::category_for(&supplement.name);
                                let icon = catalog::icon_for(&supplement.name, category);
                                let label = supplement.name.clone();
                                view! {
                                    <button
                                        class="search-dropdown-item"
                                        on:click=move |_| select_suggestion(supplement.clone())
                                    >
                                        <span class="supplement-icon">{icon}</span>
                                        <span class="supplement-name">{label}</span>
                                    </button>
                                }
                            }).collect_view()}
                        </div>
                    })
                }}
            </section>

            <section class="supplement-carousel">
                {move || match load_state.get() {
                    LoadState::Connecting | LoadState::Loading => view! {
                        <div class="carousel-track">
                            <div class="loading">"Loading supplements..."</div>
                        </div>
                    }
                    .into_view(),
                    LoadState::Failed(message) => view! {
                        <div class="carousel-track">
                            <div class="error-message">
                                <i class="fa fa-exclamation-triangle"></i>
                                " " {message}
                            </div>
                        </div>
                    }
                    .into_view(),
                    LoadState::Ready => {
                        let groups = groups.get();
                        let track_class = catalog::track_class(groups.len());
                        view! {
                            <div class=track_class>
                                {groups.into_iter().map(|(category, members)| {
                                    let icon = catalog::icon_for(&members[0].name, category);
                                    let label = category.display_name();
                                    view! {
                                        <div
                                            class="supplement-item"
                                            data-category=category.key()
                                            on:click=move |_| select_category(category)
                                        >
                                            <div class="supplement-icon">{icon}</div>
                                            <span>{label}</span>
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        }
                        .into_view()
                    }
                }}
            </section>

            {move || active_category.get().map(|category| {
                let members = groups.get().into_iter()
                    .find(|(c, _)| *c == category)
                    .map(|(_, members)| members)
                    .unwrap_or_default();
                view! {
                    <section id="specific-carousel" class="specific-carousel" node_ref=specific_ref>
                        <div id="specific-track" class=catalog::track_class(members.len())>
                            {members.into_iter().map(|supplement| {
                                let icon = catalog::icon_for(&supplement.name, category);
                                let label = supplement.name.clone();
                                let is_active = {
                                    let name = supplement.name.clone();
                                    move || spotlight.with(|s| {
                                        s.as_ref().is_some_and(|s| s.name == name)
                                    })
                                };
                                view! {
                                    <div
                                        class="specific-supplement-item"
                                        class:active=is_active
                                        on:click=move |_| show_spotlight(supplement.clone())
                                    >
                                        <div class="supplement-icon">{icon}</div>
                                        <span>{label}</span>
                                    </div>
                                }
                            }).collect_view()}
                        </div>
                    </section>
                }
            })}

            {move || spotlight.get().map(|supplement| {
                let name = supplement.name.clone();
                let description = supplement.spotlight_description();
                let link = format!("?name={}", js_sys::encode_uri_component(&supplement.name));
                let price = supplement.price_line();
                view! {
                    <section class="spotlight" node_ref=spotlight_ref>
                        <div class="content">
                            <h3>{name}</h3>
                            <p>{description}</p>
                            <a href=link class="button">"Read the Research →"</a>
                            {price.map(|price| view! {
                                <div class="price-section">
                                    <ul>
                                        <li>
                                            <strong>"Amazon: "</strong>
                                            "Check Price "
                                            <sup>{format!("({})", price)}</sup>
                                        </li>
                                    </ul>
                                </div>
                            })}
                        </div>
                    </section>
                }
            })}
        </div>
    }
}
