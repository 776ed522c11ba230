//! Prompt text sent to the advisory model.

use std::fmt::Write;

use crate::health::HealthMap;
use crate::part::Part;

pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful maintenance assistant. Be concise and professional.";

/// One context block per part followed by the operator's query and guidance.
///
/// Parts missing from `health` are listed without wear figures.
#[must_use]
pub fn build_prompt(parts: &[Part], health: &HealthMap, query: &str) -> String {
    let mut context = String::new();
    for part in parts {
        let _ = writeln!(
            context,
            "- Machine: {} | Part: {} ({})\n  Installed: {}\n  Lifespan: {} days",
            part.machine_id,
            part.name,
            part.category,
            part.install_date.format("%Y-%m-%d"),
            part.lifespan_days
        );
        match health.get(&part.id) {
            Some(h) => {
                let _ = writeln!(
                    context,
                    "  Status: {:.1}% used ({})\n  Days Remaining: {}",
                    h.percentage_used, h.status, h.days_remaining
                );
            }
            None => {
                let _ = writeln!(context, "  Status: unknown");
            }
        }
    }

    format!(
        "You are an expert industrial and mechanical maintenance advisor.\n\
         Here is the current status of the parts in the system:\n\n\
         {context}\n\
         User Query: \"{query}\"\n\n\
         Based on the data above, provide a concise, helpful response.\n\
         If the user asks for a summary, prioritize mentioning \"Critical\" or \"Warning\" parts.\n\
         If the user asks about a specific part, look up its details in the list above.\n\
         If the user asks about a specific Machine ID (e.g. M-01), focus on parts for that machine.\n\
         Keep advice practical.\n"
    )
}
