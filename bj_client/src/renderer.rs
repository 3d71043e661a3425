//! Plain-text rendering of the table.
//!
//! Card reveals are paced here: each one is shown, held for the animation
//! time and only then reported complete, so the table waits for the
//! renderer before moving on.

use blackjack_table::{
    AnimationFeed, Card, TableView, format_money,
    entities::{InsuranceDecision, Spot},
    table::{AnimationEvent, CardFace, Destination, InsuranceMode, Phase},
};
use std::{fmt::Write as _, time::Duration};
use tokio::sync::mpsc;

fn cards_to_string(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".to_string();
    }
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn describe_reveal(event: &AnimationEvent) -> String {
    let face = match event.face {
        CardFace::Up(card) => card.to_string(),
        CardFace::Down => "hole card".to_string(),
    };
    match event.destination {
        Destination::Spot(number) => format!("  spot {number} <- {face}"),
        Destination::Dealer => format!("  dealer <- {face}"),
    }
}

/// Completes every reveal after showing it for `card_animation`.
///
/// Returns once the table has shut down.
pub async fn run_reveals(mut feed: AnimationFeed, card_animation: Duration) {
    while let Some(reveal) = feed.next_reveal().await {
        println!("{}", describe_reveal(&reveal.event));
        if !card_animation.is_zero() {
            tokio::time::sleep(card_animation).await;
        }
        reveal.complete();
    }
    tracing::debug!("Reveal feed closed");
}

fn render_spot(out: &mut String, spot: &Spot, active: bool) {
    let marker = if active { ">" } else { " " };
    let _ = write!(
        out,
        "{marker} spot {} [{}] {}",
        spot.spot_number,
        format_money(spot.wager, false),
        cards_to_string(&spot.cards)
    );
    if !spot.active && spot.id.is_some() {
        out.push_str(" (out)");
    }
    if spot.is_bust {
        out.push_str(" BUST");
    } else if spot.is_blackjack {
        out.push_str(" BLACKJACK");
    }
    if spot.doubled {
        out.push_str(" doubled");
    }
    match spot.insurance {
        InsuranceDecision::Insured => out.push_str(" insured"),
        InsuranceDecision::Declined | InsuranceDecision::Undecided => {}
    }
    if let Some(outcome) = spot.outcome {
        let _ = write!(out, " {outcome}");
    }
    if let Some(profit) = spot.profit {
        let _ = write!(out, " {}", format_money(profit, true));
    }
    if let Some(outcome) = spot.insurance_outcome {
        let _ = write!(out, " ({outcome})");
    }
    out.push('\n');
}

/// The whole table as text.
pub fn render_view(view: &TableView) -> String {
    let mut out = String::new();

    match &view.session {
        Some(session) => {
            let _ = writeln!(
                out,
                "== Session {} | {} decks, pays {} | hands {} | profit {} | shoe {:.0}% used ==",
                session.id,
                session.decks,
                session.payout(),
                session.hand_count,
                format_money(session.profit, true),
                view.discard_fraction * 100.0
            );
        }
        None => {
            out.push_str("== No session. Type 'new' or 'resume' ==\n");
            if let Some(error) = &view.error {
                let _ = writeln!(out, "!! {error}");
            }
            return out;
        }
    }

    if view.shuffling {
        out.push_str("** Shuffling the shoe **\n");
    }

    if view.is_dealt {
        let _ = writeln!(out, "dealer: {}", cards_to_string(&view.hand.dealer_cards));
    }

    let active = view.active_spot_id();
    for spot in &view.spots {
        render_spot(&mut out, spot, active.is_some() && spot.id == active);
    }

    let chip = view
        .selected_chip
        .map_or_else(|| "none".to_string(), |chip| format_money(chip, false));
    let _ = writeln!(
        out,
        "wagered {} | chip {}{} | {}",
        format_money(view.total_wager, false),
        chip,
        if view.bet_all { " (bet all)" } else { "" },
        view.phase
    );

    if view.phase == Phase::InsurancePending {
        let mode = match view.insurance_mode {
            InsuranceMode::Group => "insure yes|no, or insure each",
            InsuranceMode::Individual => "insure SPOT yes|no",
        };
        let _ = writeln!(out, "Insurance? {mode}");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "!! {error}");
    }
    out
}

/// Prints the table whenever a settled snapshot differs from the last one
/// printed.
pub async fn print_updates(mut updates: mpsc::Receiver<TableView>) {
    let mut last = String::new();
    while let Some(view) = updates.recv().await {
        if view.loading {
            continue;
        }
        let rendered = render_view(&view);
        if rendered != last {
            print!("{rendered}");
            last = rendered;
        }
    }
}
