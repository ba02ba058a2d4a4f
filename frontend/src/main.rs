#![allow(non_snake_case)]

use models::routes;
use sycamore::prelude::*;
use web_sys::window;

use crate::display::DisplayView;

mod display;
mod fetch;
mod helpers;

fn main() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    wasm_logger::init(wasm_logger::Config::default());

    let Some(base_url) = page_base() else {
        log::error!("no page location to fetch from");
        return;
    };

    sycamore::render(|cx| {
        view! { cx,
            DisplayView(base_url=base_url, refresh=None)
        }
    })
}

/// Origin and path the page was loaded from; query and fragment are left out.
fn page_base() -> Option<String> {
    let location = window()?.location();
    Some(routes::page_base(
        &location.origin().ok()?,
        &location.pathname().ok()?,
    ))
}
