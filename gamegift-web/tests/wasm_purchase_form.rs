#![cfg(target_arch = "wasm32")]

use gamegift_core::{
    BuyStatus, FetchResolution, GameRef, NameCollator, PurchaseRequest, Recipient,
};
use gamegift_web::app::{App, AppProps};
use gamegift_web::bootstrap::BootstrapConfig;
use gamegift_web::collator::BrowserCollator;
use gamegift_web::components::purchase_form::{
    FormEngine, FormView, action_callback, render_form,
};
use gamegift_web::dom;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, HtmlInputElement};
use yew::prelude::*;
use yew::Renderer;

wasm_bindgen_test_configure!(run_in_browser);

fn ensure_root(id: &str) -> web_sys::Element {
    let doc = dom::window()
        .and_then(|w| w.document())
        .expect("document");
    if let Some(root) = doc.get_element_by_id(id) {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create root");
    root.set_id(id);
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append root");
    root
}

async fn settle() {
    for _ in 0..3 {
        let _ = JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL)).await;
    }
}

#[wasm_bindgen_test]
fn intl_collator_orders_names() {
    let collator = BrowserCollator::for_lang("en");
    assert_eq!(collator.compare("ash", "Beth"), Ordering::Less);
    assert_eq!(collator.compare("Zed", "mara"), Ordering::Greater);
}

#[wasm_bindgen_test]
async fn anonymous_visitor_sees_invite_toggle() {
    gamegift_web::i18n::set_lang("en");
    let root = ensure_root("gift-root");
    let config = BootstrapConfig {
        api_base: "/api".into(),
        user: None,
        game: GameRef::new(3, "Kart Party"),
        locale: None,
    };
    Renderer::<App>::with_root_and_props(root.clone(), AppProps { config }).render();
    settle().await;

    assert!(
        root.query_selector("[data-testid=\"showInvite\"]")
            .ok()
            .flatten()
            .is_some()
    );
    assert!(
        root.query_selector("[data-testid=\"invite\"]")
            .ok()
            .flatten()
            .is_none()
    );
}

type Emitted = Rc<RefCell<Vec<PurchaseRequest>>>;

#[derive(Properties, PartialEq)]
struct SeededFormProps {
    initial: PurchaseRequest,
    emitted: Emitted,
}

// Form wired like `PurchaseForm`, with the roster loaded up front.
#[function_component(SeededForm)]
fn seeded_form(props: &SeededFormProps) -> Html {
    let value = use_state(|| props.initial.clone());
    let engine = use_mut_ref(|| {
        let mut engine = FormEngine::with_collator(BrowserCollator::for_lang("en"));
        if let Some(ticket) = engine.begin_fetch(Some(Recipient::new(1, "Mara", Some(30)))) {
            engine.resolve_fetch::<String>(FetchResolution::new(
                ticket,
                Ok(vec![
                    Recipient::new(2, "Theo", Some(14)),
                    Recipient::new(3, "Ash", Some(40)),
                ]),
            ));
        }
        engine
    });
    let redraw = use_force_update();
    let on_change = {
        let value = value.clone();
        let emitted = props.emitted.clone();
        Callback::from(move |next: PurchaseRequest| {
            emitted.borrow_mut().push(next.clone());
            value.set(next);
        })
    };
    let dispatch = action_callback(engine.clone(), (*value).clone(), on_change, redraw);
    let engine = engine.borrow();
    render_form(&FormView {
        value: &value,
        engine: &engine,
        locked: false,
        buy_status: BuyStatus::Idle,
        dispatch: &dispatch,
    })
}

fn checkbox(root: &web_sys::Element, testid: &str) -> HtmlInputElement {
    root.query_selector(&format!("[data-testid=\"{testid}\"]"))
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .expect("checkbox rendered")
}

fn click(input: &HtmlInputElement) {
    let element: &HtmlElement = input.as_ref();
    element.click();
}

#[wasm_bindgen_test]
async fn checking_recipients_emits_or_reverts() {
    gamegift_web::i18n::set_lang("en");
    let root = ensure_root("seeded-form-root");
    let emitted: Emitted = Rc::default();
    let props = SeededFormProps {
        initial: PurchaseRequest::for_game(GameRef::new(5, "Dread Manor").with_min_age(18)),
        emitted: emitted.clone(),
    };
    Renderer::<SeededForm>::with_root_and_props(root.clone(), props).render();
    settle().await;

    let ash = checkbox(&root, "user3");
    click(&ash);
    assert_eq!(emitted.borrow().len(), 1);
    assert_eq!(emitted.borrow()[0].selected_recipient_ids, vec![3]);
    assert!(ash.checked());
    settle().await;

    let theo = checkbox(&root, "user2");
    click(&theo);
    assert_eq!(emitted.borrow().len(), 1);
    assert!(!theo.checked());
    settle().await;
    assert!(
        root.query_selector("[data-testid=\"disclaimer2\"]")
            .ok()
            .flatten()
            .is_some()
    );
    assert!(checkbox(&root, "user3").checked());
}
