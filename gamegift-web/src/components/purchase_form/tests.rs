use super::*;
use crate::collator::BrowserCollator;
use futures::executor::block_on;
use gamegift_core::{FetchResolution, GameRef, Recipient};
use yew::LocalServerRenderer;

#[derive(Properties, PartialEq, Clone)]
struct HarnessProps {
    value: PurchaseRequest,
    #[prop_or_default]
    blocked: Option<u64>,
    #[prop_or_default]
    invite_open: bool,
    #[prop_or_default]
    buy_status: BuyStatus,
}

fn seeded_engine(props: &HarnessProps) -> FormEngine {
    let mut engine = FormEngine::with_collator(BrowserCollator::for_lang("en"));
    let ticket = engine
        .begin_fetch(Some(Recipient::new(1, "Mara", Some(30))))
        .expect("ticket");
    engine.resolve_fetch::<String>(FetchResolution::new(
        ticket,
        Ok(vec![
            Recipient::new(2, "Theo", Some(14)),
            Recipient::new(3, "Ash", None),
        ]),
    ));
    if let Some(id) = props.blocked {
        let _ = engine.toggle_recipient(&props.value, id, true);
    }
    if props.invite_open {
        let _ = engine.toggle_invite_panel(&props.value, true);
    }
    engine
}

#[function_component(Harness)]
fn harness(props: &HarnessProps) -> Html {
    let engine = seeded_engine(props);
    let dispatch = Callback::from(|_action: FormAction| false);
    render_form(&FormView {
        value: &props.value,
        engine: &engine,
        locked: props.buy_status.locks_inputs(),
        buy_status: props.buy_status,
        dispatch: &dispatch,
    })
}

fn render(props: HarnessProps) -> String {
    crate::i18n::set_lang("en");
    block_on(LocalServerRenderer::<Harness>::with_props(props).render())
}

fn restricted_request() -> PurchaseRequest {
    PurchaseRequest::for_game(GameRef::new(5, "Dread Manor").with_min_age(18))
}

#[test]
fn roster_is_sorted_and_marks_me() {
    let html = render(HarnessProps {
        value: PurchaseRequest::for_game(GameRef::new(5, "Kart Party")),
        blocked: None,
        invite_open: false,
        buy_status: BuyStatus::Idle,
    });
    let ash = html.find("Ash").expect("Ash rendered");
    let mara = html.find("Mara").expect("Mara rendered");
    let me = html.find("(me)").expect("me suffix rendered");
    let theo = html.find("Theo").expect("Theo rendered");
    assert!(ash < mara && mara < me && me < theo);
    assert_eq!(html.matches("(me)").count(), 1);
    assert!(!html.contains("data-testid=\"invite\""));
}

#[test]
fn blocked_recipient_shows_single_disclaimer() {
    let html = render(HarnessProps {
        value: restricted_request(),
        blocked: Some(2),
        invite_open: false,
        buy_status: BuyStatus::Idle,
    });
    assert!(html.contains("Theo is younger than 18 and cannot receive this game."));
    assert!(html.contains("data-testid=\"disclaimer2\""));
    assert_eq!(html.matches("role=\"alert\"").count(), 1);
}

#[test]
fn unknown_age_uses_its_own_message() {
    let html = render(HarnessProps {
        value: restricted_request(),
        blocked: Some(3),
        invite_open: false,
        buy_status: BuyStatus::Idle,
    });
    assert!(html.contains("how old Ash is"));
}

#[test]
fn invite_panel_shows_trailing_slot_and_age_ack_for_restricted_games() {
    let value = restricted_request()
        .with_invite_email(0, "pal@example.com")
        .unwrap();
    let html = render(HarnessProps {
        value,
        blocked: None,
        invite_open: true,
        buy_status: BuyStatus::Idle,
    });
    assert!(html.contains("data-testid=\"invite\""));
    assert!(html.contains("data-testid=\"email0\""));
    assert!(html.contains("data-testid=\"email1\""));
    assert!(!html.contains("data-testid=\"email2\""));
    assert!(html.contains("data-testid=\"acknowledgeInvite\""));
    assert!(html.contains("data-testid=\"acknowledgeInviteAge\""));
}

#[test]
fn unrestricted_games_hide_the_age_acknowledgement() {
    let html = render(HarnessProps {
        value: PurchaseRequest::for_game(GameRef::new(5, "Kart Party")),
        blocked: None,
        invite_open: true,
        buy_status: BuyStatus::Idle,
    });
    assert!(html.contains("data-testid=\"acknowledgeInvite\""));
    assert!(!html.contains("acknowledgeInviteAge"));
}

#[test]
fn in_progress_purchase_disables_every_input() {
    let html = render(HarnessProps {
        value: restricted_request(),
        blocked: None,
        invite_open: true,
        buy_status: BuyStatus::InProgress,
    });
    let inputs: Vec<&str> = html
        .split("<input")
        .skip(1)
        .map(|rest| rest.split('>').next().unwrap_or_default())
        .collect();
    // three recipients, the invite toggle, one email slot and two acknowledgements
    assert_eq!(inputs.len(), 7);
    assert!(inputs.iter().all(|tag| tag.contains("disabled")));
    assert!(html.contains("Purchasing"));
}

#[test]
fn purchase_form_without_user_renders_invite_toggle_only() {
    crate::i18n::set_lang("en");
    let props = PurchaseFormProps {
        value: PurchaseRequest::for_game(GameRef::new(1, "Kart Party")),
        on_change: Callback::noop(),
        buy_status: BuyStatus::Idle,
    };
    let html = block_on(LocalServerRenderer::<PurchaseForm>::with_props(props).render());
    assert!(html.contains("data-testid=\"showInvite\""));
    assert!(!html.contains("data-testid=\"user"));
    assert!(!html.contains("data-testid=\"invite\""));
}

#[test]
fn purchase_form_reopens_panel_for_existing_invites() {
    crate::i18n::set_lang("en");
    let props = PurchaseFormProps {
        value: PurchaseRequest::for_game(GameRef::new(1, "Kart Party"))
            .with_invite_email(0, "pal@example.com")
            .unwrap(),
        on_change: Callback::noop(),
        buy_status: BuyStatus::Idle,
    };
    let html = block_on(LocalServerRenderer::<PurchaseForm>::with_props(props).render());
    assert!(html.contains("data-testid=\"invite\""));
    assert!(html.contains("data-testid=\"email1\""));
}

#[test]
fn disclaimer_message_fills_placeholders() {
    crate::i18n::set_lang("en");
    let text = disclaimer_message(
        gamegift_core::EligibilityDisclaimer {
            recipient_id: 4,
            reason: gamegift_core::DisclaimerReason::BelowMinimumAge,
        },
        "Rin",
        Some(16),
    );
    assert_eq!(text, "Rin is younger than 16 and cannot receive this game.");
}
