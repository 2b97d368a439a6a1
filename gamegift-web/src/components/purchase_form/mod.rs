//! Gift purchase form: choose friends to receive a game or invite people by email.
mod view;
#[cfg(test)]
mod tests;

use gamegift_core::{
    BuyStatus, FormAction, PurchaseRequest, RecipientSelectionEngine, fetch_recipients,
};
use std::cell::RefCell;
use std::rc::Rc;
use yew::functional::UseForceUpdateHandle;
use yew::prelude::*;

use crate::collator::BrowserCollator;
use crate::context::{ApiConfig, CurrentUser};
use crate::directory::HttpFriendDirectory;
use crate::i18n;

pub use view::{FormView, disclaimer_message, render_form};

pub type FormEngine = RecipientSelectionEngine<BrowserCollator>;

#[derive(Properties, PartialEq, Clone)]
pub struct PurchaseFormProps {
    /// Latest snapshot from the parent.
    pub value: PurchaseRequest,
    /// Receives every new snapshot; the parent passes it back as `value`.
    pub on_change: Callback<PurchaseRequest>,
    #[prop_or_default]
    pub buy_status: BuyStatus,
}

/// Run one action against the latest snapshot; the callback reports whether
/// a snapshot was emitted.
#[must_use]
pub fn action_callback(
    engine: Rc<RefCell<FormEngine>>,
    value: PurchaseRequest,
    on_change: Callback<PurchaseRequest>,
    redraw: UseForceUpdateHandle,
) -> Callback<FormAction, bool> {
    Callback::from(move |action: FormAction| {
        let emitted = engine.borrow_mut().dispatch(&value, action);
        redraw.force_update();
        match emitted {
            Some(next) => {
                on_change.emit(next);
                true
            }
            None => false,
        }
    })
}

#[function_component(PurchaseForm)]
pub fn purchase_form(props: &PurchaseFormProps) -> Html {
    let api = use_context::<ApiConfig>().unwrap_or_default();
    let current_user = use_context::<CurrentUser>().unwrap_or_default().0;
    let engine = {
        let value = props.value.clone();
        use_mut_ref(move || {
            let mut engine =
                FormEngine::with_collator(BrowserCollator::for_lang(&i18n::current_lang()));
            engine.restore_invite_panel(&value);
            engine
        })
    };
    let redraw = use_force_update();

    // Reload the roster whenever the signed-in user changes
    {
        let engine = engine.clone();
        let redraw = redraw.clone();
        use_effect_with(current_user, move |user| {
            let ticket = engine.borrow_mut().begin_fetch(user.clone());
            match ticket {
                Some(ticket) => {
                    let directory = HttpFriendDirectory::new(api.api_base.to_string());
                    wasm_bindgen_futures::spawn_local(async move {
                        let resolution = fetch_recipients(&directory, ticket).await;
                        if let Err(err) = &resolution.result {
                            crate::dom::console_error(&format!("Failed to load friends: {err}"));
                        }
                        engine.borrow_mut().resolve_fetch(resolution);
                        redraw.force_update();
                    });
                }
                None => redraw.force_update(),
            }
            || {}
        });
    }

    let dispatch = action_callback(
        engine.clone(),
        props.value.clone(),
        props.on_change.clone(),
        redraw,
    );

    let engine = engine.borrow();
    render_form(&FormView {
        value: &props.value,
        engine: &engine,
        locked: props.buy_status.locks_inputs(),
        buy_status: props.buy_status,
        dispatch: &dispatch,
    })
}
