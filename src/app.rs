use leptos::*;

use crate::pages::{HomePage, SupplementPage};
use crate::supabase;

/// Which page the current URL resolves to. The detail page is selected
/// whenever a record-identifying query parameter is present; everything
/// else is the landing page.
#[derive(Clone, Debug, PartialEq)]
pub enum AppView {
    Home,
    Detail,
}

pub fn resolve_view() -> AppView {
    let has_param = ["id", "slug", "name"]
        .iter()
        .any(|name| query_param(name).is_some());
    if has_param {
        AppView::Detail
    } else {
        AppView::Home
    }
}

/// Read a query parameter from the current location, tolerating values
/// that fail to percent-decode (the raw value is used instead).
pub fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    let raw = params.get(name)?;
    let decoded = js_sys::decode_uri_component(&raw)
        .map(String::from)
        .unwrap_or(raw);
    Some(decoded)
}

#[component]
pub fn App() -> impl IntoView {
    // Single client handle, constructed once and injected into whichever
    // page mounts. None means the backend is unreachable; pages surface
    // that through their bounded readiness poll.
    let (client, _set_client) = create_signal(supabase::Client::new());

    view! {
        <div class="app">
            {match resolve_view() {
                AppView::Detail => view! { <SupplementPage client=client/> }.into_view(),
                AppView::Home => view! { <HomePage client=client/> }.into_view(),
            }}
        </div>
    }
}
