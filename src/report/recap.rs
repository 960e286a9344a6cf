//! Sentence templates for the insight recap.

use crate::aggregates::AggregateKind;
use crate::insights::{InsightFact, InsightSet, RankedEntry, TrendDirection};
use crate::report::chart::display_label;

pub const RECAP_TITLE: &str = "# Media Intelligence Dashboard Recap";

pub fn heading(kind: AggregateKind) -> &'static str {
    match kind {
        AggregateKind::Sentiment => "Sentiment Breakdown Insights",
        AggregateKind::EngagementTrend => "Engagement Trend Over Time Insights",
        AggregateKind::Platform => "Platform Engagements Insights",
        AggregateKind::MediaType => "Media Type Mix Insights",
        AggregateKind::TopLocations => "Top 5 Locations by Engagements Insights",
    }
}

fn noun(kind: AggregateKind) -> &'static str {
    match kind {
        AggregateKind::Sentiment => "sentiment",
        AggregateKind::EngagementTrend => "day",
        AggregateKind::Platform => "platform",
        AggregateKind::MediaType => "media type",
        AggregateKind::TopLocations => "location",
    }
}

fn plural(count: u64, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

fn leader_sentence(kind: AggregateKind, entry: &RankedEntry) -> String {
    let label = display_label(&entry.label);
    match kind {
        AggregateKind::Sentiment => format!(
            "The dominant sentiment is '{label}', accounting for {:.2}% of all entries.",
            entry.share_pct
        ),
        AggregateKind::MediaType => format!(
            "'{label}' is the most prevalent media type, making up {:.2}% of the analyzed content.",
            entry.share_pct
        ),
        AggregateKind::Platform => format!(
            "'{label}' is the leading platform in terms of engagements, contributing {:.2}% of the total.",
            entry.share_pct
        ),
        AggregateKind::TopLocations | AggregateKind::EngagementTrend => format!(
            "The top {} by engagements is '{label}' with {} ({:.2}% of all engagements).",
            noun(kind),
            plural(entry.value, "engagement", "engagements"),
            entry.share_pct
        ),
    }
}

/// Renders one fact as a sentence.
pub fn sentence(kind: AggregateKind, fact: &InsightFact) -> String {
    match fact {
        InsightFact::Leader { entry } => leader_sentence(kind, entry),
        InsightFact::RunnerUp { entry: Some(entry) } => format!(
            "'{}' ranks second with {} ({:.2}%).",
            display_label(&entry.label),
            plural(entry.value, "entry", "entries"),
            entry.share_pct
        ),
        InsightFact::RunnerUp { entry: None } => {
            format!("No other {} appears in the data.", noun(kind))
        }
        InsightFact::RecordCount {
            records,
            categories,
        } => format!(
            "A total of {} across {} {} were analyzed.",
            plural(*records, "entry", "entries"),
            categories,
            if *categories == 1 { "category" } else { "categories" }
        ),
        InsightFact::Peak { date, engagements } => format!(
            "The highest engagement occurred on {} with {}.",
            date.format("%Y-%m-%d"),
            plural(*engagements, "engagement", "engagements")
        ),
        InsightFact::Direction {
            first_date,
            first,
            last_date,
            last,
            direction,
            change_pct,
        } => {
            let verb = match direction {
                TrendDirection::Increase => "increased",
                TrendDirection::Decrease => "decreased",
                TrendDirection::Flat => "held steady",
            };
            let change = change_pct
                .map(|pct| format!(" ({pct:+.2}%)"))
                .unwrap_or_default();
            format!(
                "Engagement {verb} from {first} on {} to {last} on {}{change}.",
                first_date.format("%Y-%m-%d"),
                last_date.format("%Y-%m-%d"),
            )
        }
        InsightFact::TotalEngagements { total, groups } => match kind {
            AggregateKind::EngagementTrend => format!(
                "Overall, the data covers {} with a total of {}.",
                plural(*groups as u64, "day", "days"),
                plural(*total, "engagement", "engagements")
            ),
            _ => format!(
                "The sum of engagements across {} is {total}.",
                plural(*groups as u64, noun(kind), &format!("{}s", noun(kind)))
            ),
        },
        InsightFact::Margin {
            leader,
            runner_up: Some(runner_up),
            margin,
        } => format!(
            "'{}' leads '{}' by {}.",
            display_label(leader),
            display_label(runner_up),
            plural(*margin, "engagement", "engagements")
        ),
        InsightFact::Margin {
            leader,
            runner_up: None,
            ..
        } => format!(
            "'{}' is the only {} in the data.",
            display_label(leader),
            noun(kind)
        ),
        InsightFact::Concentration {
            listed,
            listed_total,
            share_pct,
        } => format!(
            "The top {} account for {}, {share_pct:.2}% of the total.",
            plural(*listed as u64, noun(kind), &format!("{}s", noun(kind))),
            plural(*listed_total, "engagement", "engagements")
        ),
        InsightFact::NoData => format!("No {} data is available.", noun(kind)),
    }
}

/// Renders the recap document: title, then a heading and three bullets per aggregate.
pub fn render_recap(sets: &[InsightSet]) -> String {
    let mut recap = format!("{RECAP_TITLE}\n\n");
    for set in sets {
        recap.push_str(&format!("## {}\n", heading(set.kind)));
        for insight in &set.insights {
            recap.push_str(&format!("- {}\n", sentence(set.kind, &insight.fact)));
        }
        recap.push('\n');
    }
    recap
}
