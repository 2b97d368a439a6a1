use gamegift_core::{
    AcknowledgementFlag, BuyStatus, EligibilityDisclaimer, FormAction, PurchaseRequest, Recipient,
};
use std::collections::BTreeMap;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::FormEngine;
use crate::i18n;

/// Everything the form markup is rendered from.
pub struct FormView<'a> {
    pub value: &'a PurchaseRequest,
    pub engine: &'a FormEngine,
    pub locked: bool,
    pub buy_status: BuyStatus,
    pub dispatch: &'a Callback<FormAction, bool>,
}

/// Localized text for the live disclaimer.
#[must_use]
pub fn disclaimer_message(
    disclaimer: EligibilityDisclaimer,
    name: &str,
    min_age: Option<u32>,
) -> String {
    let min_age = min_age.map(|age| age.to_string()).unwrap_or_default();
    let mut args = BTreeMap::new();
    args.insert("name", name);
    args.insert("min_age", min_age.as_str());
    i18n::tr(disclaimer.reason.message_key(), Some(&args))
}

const fn status_key(status: BuyStatus) -> &'static str {
    match status {
        BuyStatus::Idle => "status.idle",
        BuyStatus::InProgress => "status.in_progress",
        BuyStatus::Succeeded => "status.succeeded",
        BuyStatus::Failed => "status.failed",
    }
}

fn recipient_row(view: &FormView<'_>, recipient: &Recipient) -> Html {
    let id = recipient.id;
    let onchange = {
        let dispatch = view.dispatch.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let checked = input.checked();
            let emitted = dispatch.emit(FormAction::ToggleRecipient {
                recipient_id: id,
                checked,
            });
            if !emitted {
                // Blocked: keep the box unchecked, the disclaimer explains why
                input.set_checked(false);
            }
        })
    };
    let me_suffix = if view.engine.roster().is_me(id) {
        i18n::t("form.me_suffix")
    } else {
        String::new()
    };
    let disclaimer = view.engine.disclaimer_for(id).map(|d| {
        let text = disclaimer_message(d, &recipient.name, view.value.game.min_age());
        html! {
            <p class="disclaimer" role="alert" data-testid={format!("disclaimer{id}")}>{ text }</p>
        }
    });

    html! {
        <div class="recipient" key={id.to_string()}>
            <label data-testid={format!("user{id}Label")}>
                <input
                    type="checkbox"
                    checked={view.value.is_selected(id)}
                    disabled={view.locked}
                    onchange={onchange}
                    data-testid={format!("user{id}")}
                />
                { recipient.name.clone() }{ me_suffix }
            </label>
            { for disclaimer }
        </div>
    }
}

fn email_slot(view: &FormView<'_>, index: usize, email: &str) -> Html {
    let oninput = {
        let dispatch = view.dispatch.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatch.emit(FormAction::SetInviteEmail {
                index,
                value: input.value(),
            });
        })
    };
    let number = (index + 1).to_string();
    let mut args = BTreeMap::new();
    args.insert("index", number.as_str());
    let label = i18n::tr("form.email_label", Some(&args));

    html! {
        <label key={format!("email{index}")} class="invite-email">
            <span class="sr-only">{ label }</span>
            <input
                type="email"
                value={email.to_string()}
                placeholder={i18n::t("form.email_placeholder")}
                disabled={view.locked}
                oninput={oninput}
                data-testid={format!("email{index}")}
            />
        </label>
    }
}

fn acknowledgement_box(view: &FormView<'_>, flag: AcknowledgementFlag) -> Html {
    let (name, text_key) = match flag {
        AcknowledgementFlag::Invite => ("acknowledgeInvite", "form.acknowledge_invite"),
        AcknowledgementFlag::InviteAge => ("acknowledgeInviteAge", "form.acknowledge_invite_age"),
    };
    let onchange = {
        let dispatch = view.dispatch.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatch.emit(FormAction::SetAcknowledgement {
                flag,
                checked: input.checked(),
            });
        })
    };

    html! {
        <label class="acknowledgement">
            <input
                type="checkbox"
                name={name}
                required=true
                checked={view.value.acknowledgement(flag)}
                disabled={view.locked}
                onchange={onchange}
                data-testid={name}
            />
            { i18n::t(text_key) }
        </label>
    }
}

fn invite_panel(view: &FormView<'_>) -> Html {
    let open = view.engine.is_invite_panel_open();
    let on_toggle = {
        let dispatch = view.dispatch.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatch.emit(FormAction::ToggleInvitePanel {
                open: input.checked(),
            });
        })
    };

    let body = open.then(|| {
        let age_ack = view
            .value
            .game
            .is_age_restricted()
            .then(|| acknowledgement_box(view, AcknowledgementFlag::InviteAge));
        let slots = view
            .value
            .invite_slots()
            .into_iter()
            .enumerate()
            .map(|(index, email)| email_slot(view, index, email));
        html! {
            <div class="invite-panel" data-testid="invite">
                { for slots }
                { acknowledgement_box(view, AcknowledgementFlag::Invite) }
                { for age_ack }
            </div>
        }
    });

    html! {
        <>
            <label class="invite-toggle">
                <input
                    type="checkbox"
                    checked={open}
                    disabled={view.locked}
                    onchange={on_toggle}
                    data-testid="showInvite"
                />
                { i18n::t("form.invite_toggle") }
            </label>
            { for body }
        </>
    }
}

/// Markup of the whole form.
#[must_use]
pub fn render_form(view: &FormView<'_>) -> Html {
    let min_age_notice = view.value.game.min_age().map(|age| {
        let age = age.to_string();
        let mut args = BTreeMap::new();
        args.insert("min_age", age.as_str());
        html! { <p class="age-notice">{ i18n::tr("form.min_age_notice", Some(&args)) }</p> }
    });
    let status = i18n::t(status_key(view.buy_status));

    html! {
        <form class="purchase-form" aria-busy={view.locked.to_string()}>
            <h3>{ i18n::t("form.title") }</h3>
            { for min_age_notice }
            <div class="recipients">
                { for view.engine.roster().entries().iter().map(|r| recipient_row(view, r)) }
            </div>
            { invite_panel(view) }
            <p class="purchase-status" role="status" aria-live="polite">{ status }</p>
        </form>
    }
}
