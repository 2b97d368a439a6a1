//! Host component: owns the purchase snapshot and provides the form's contexts.
use gamegift_core::{BuyStatus, PurchaseRequest, PurchaseValidationError, validate_purchase};
use std::collections::BTreeMap;
use yew::prelude::*;

use crate::bootstrap::BootstrapConfig;
use crate::components::purchase_form::PurchaseForm;
use crate::context::{ApiConfig, CurrentUser};
use crate::i18n;

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: BootstrapConfig,
}

/// Localized text for a validation failure.
#[must_use]
pub fn validation_message(err: &PurchaseValidationError) -> String {
    match err {
        PurchaseValidationError::NoRecipients => i18n::t("validation.no_recipients"),
        PurchaseValidationError::InvalidEmail { value, .. } => {
            let mut args = BTreeMap::new();
            args.insert("value", value.as_str());
            i18n::tr("validation.invalid_email", Some(&args))
        }
        PurchaseValidationError::InviteNotAcknowledged => {
            i18n::t("validation.invite_not_acknowledged")
        }
        PurchaseValidationError::InviteAgeNotAcknowledged => {
            i18n::t("validation.invite_age_not_acknowledged")
        }
    }
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let purchase = use_state(|| PurchaseRequest::for_game(props.config.game.clone()));
    let api = ApiConfig {
        api_base: AttrValue::from(props.config.api_base.clone()),
    };
    let user = CurrentUser(props.config.user.clone());

    let on_change = {
        let purchase = purchase.clone();
        Callback::from(move |next: PurchaseRequest| {
            log::debug!(
                "purchase updated: {} recipients, {} invite slots",
                next.selected_recipient_ids.len(),
                next.invite_emails.len()
            );
            purchase.set(next);
        })
    };

    let problem = validate_purchase(&purchase)
        .err()
        .map(|err| html! { <p class="validation muted">{ validation_message(&err) }</p> });

    html! {
        <ContextProvider<ApiConfig> context={api}>
            <ContextProvider<CurrentUser> context={user}>
                <section class="gift-purchase">
                    <h2>{ props.config.game.title.clone() }</h2>
                    <PurchaseForm
                        value={(*purchase).clone()}
                        on_change={on_change}
                        buy_status={BuyStatus::Idle}
                    />
                    { for problem }
                </section>
            </ContextProvider<CurrentUser>>
        </ContextProvider<ApiConfig>>
    }
}
