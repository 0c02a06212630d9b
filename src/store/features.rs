use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use super::error::StoreResult;
use super::records::RoutineCompletion;
use super::store::Store;
use crate::calendar::{CalendarEvent, Status};

const EXPIRY_COLOR: &str = "#ef4444";

impl Store {
    /// Calendar features for `user_id` between `start` and `end` inclusive:
    /// one per routine completion and one per product expiry. Instants are
    /// shown as wall-clock time in `tz`.
    pub fn features_for_user<Tz: TimeZone>(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: &Tz,
    ) -> StoreResult<Vec<CalendarEvent>> {
        let local = |dt: DateTime<Utc>| dt.with_timezone(tz).naive_local();

        let names: HashMap<String, String> = self
            .get_user_routines(user_id)?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let mut features: Vec<CalendarEvent> = self
            .get_routine_completions(user_id, start, end)?
            .into_iter()
            .map(|c| {
                let name = completion_name(&c, &names);
                CalendarEvent::at(
                    c.id,
                    name,
                    local(c.date),
                    Status {
                        id: c.kind.key().to_string(),
                        name: c.kind.label().to_string(),
                        color: c.kind.color().to_string(),
                    },
                )
            })
            .collect();

        for product in self.get_user_products(user_id)? {
            let Some(expiry) = product.expiry_date.filter(|d| *d >= start && *d <= end) else {
                continue;
            };
            features.push(CalendarEvent::at(
                format!("expiry-{}", product.id),
                format!("{} expires", product.name),
                local(expiry),
                Status {
                    id: "expiry".to_string(),
                    name: "Expiry".to_string(),
                    color: EXPIRY_COLOR.to_string(),
                },
            ));
        }

        features.sort_by(|a, b| (a.end_at(), &a.id).cmp(&(b.end_at(), &b.id)));
        Ok(features)
    }
}

fn completion_name(c: &RoutineCompletion, names: &HashMap<String, String>) -> String {
    let base = names
        .get(&c.routine_id)
        .cloned()
        .unwrap_or_else(|| format!("{} routine", c.kind.label()));
    if c.is_done() {
        base
    } else {
        format!("{base} (partial)")
    }
}
