use leptos::component;
use leptos::IntoView;
use leptos::view;

use crate::components::viewer::CakeViewer;

#[component]
pub fn Home() -> impl IntoView {
    view! { <CakeViewer/> }
}
