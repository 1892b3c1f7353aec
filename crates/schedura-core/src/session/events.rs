use chrono::NaiveDateTime;

use super::Session;
use crate::calendar::{self, CalendarSyncProvider, ImportReport, SyncReport};
use crate::error::{CoreError, EntityKind, Result};
use crate::filter::events_in;
use crate::model::{EntityId, Event, EventSource};
use crate::range::{within, DateBounds};

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category_id: Option<Option<EntityId>>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
}

impl EventPatch {
    fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(category_id) = self.category_id {
            event.category_id = category_id;
        }
        if let Some(start) = self.start_time {
            event.start_time = start;
        }
        if let Some(end) = self.end_time {
            event.end_time = end;
        }
    }
}

impl Session {
    fn event_index(&self, id: &str) -> Result<usize> {
        self.document
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Event, id))
    }

    pub fn add_event(&mut self, event: Event) -> Result<Event> {
        event.validate()?;
        self.require_category(event.category_id.as_deref())?;
        if let Some(task_id) = event.task_id.as_deref() {
            if self.document.task(task_id).is_none() {
                return Err(CoreError::not_found(EntityKind::Task, task_id));
            }
        }
        self.document.events.push(event.clone());
        self.persist("add_event")?;
        Ok(event)
    }

    pub fn update_event(&mut self, id: &str, patch: EventPatch) -> Result<Event> {
        let index = self.event_index(id)?;
        let mut event = self.document.events[index].clone();
        patch.apply(&mut event);
        event.validate()?;
        self.require_category(event.category_id.as_deref())?;
        self.document.events[index] = event.clone();
        self.persist("update_event")?;
        Ok(event)
    }

    pub fn delete_event(&mut self, id: &str) -> Result<Event> {
        let index = self.event_index(id)?;
        let event = self.document.events.remove(index);
        self.persist("delete_event")?;
        Ok(event)
    }

    /// Events starting within `bounds` as an iCalendar document.
    pub fn export_ics(&self, bounds: Option<&DateBounds>) -> String {
        let events: Vec<Event> = events_in(&self.document.events, bounds)
            .into_iter()
            .cloned()
            .collect();
        calendar::export_events(&events)
    }

    /// Add every valid VEVENT from `text`; malformed blocks and UIDs seen
    /// before are reported as skipped.
    pub fn import_ics(&mut self, text: &str) -> Result<ImportReport> {
        let parsed = calendar::parse_events(text);
        let mut report = ImportReport {
            imported: 0,
            skipped: parsed.skipped,
        };
        let category_id = self.document.default_category_id().map(str::to_string);

        for ics in parsed.events {
            if let Some(uid) = ics.uid.as_deref() {
                let known = self
                    .document
                    .events
                    .iter()
                    .any(|e| e.id == uid || e.external_uid.as_deref() == Some(uid));
                if known {
                    report.skipped.push(format!("{uid}: already imported"));
                    continue;
                }
            }
            let mut event = Event::new(ics.summary, ics.start, ics.end);
            event.description = ics.description;
            event.location = ics.location;
            event.category_id = category_id.clone();
            event.source = EventSource::IcsImport;
            event.external_uid = ics.uid;
            self.document.events.push(event);
            report.imported += 1;
        }

        tracing::info!(
            imported = report.imported,
            skipped = report.skipped.len(),
            "calendar imported"
        );
        if report.imported > 0 {
            self.persist("import_ics")?;
        }
        Ok(report)
    }

    /// Push local events to `provider`, then merge its events back in.
    ///
    /// Only local events without an `external_uid` are pushed. Remote events
    /// are matched on `external_uid`: known ones are updated in place, new
    /// ones are added with [`EventSource::Sync`]. Every provider call happens
    /// before the document changes, so a failed push or pull leaves it
    /// untouched.
    pub fn sync_calendar(
        &mut self,
        provider: &dyn CalendarSyncProvider,
        bounds: Option<&DateBounds>,
    ) -> Result<SyncReport> {
        if !provider.is_authenticated() {
            return Err(CoreError::Integration {
                service: provider.name().to_string(),
                message: "not authenticated".to_string(),
            });
        }
        let mut report = SyncReport {
            provider: provider.name().to_string(),
            ..SyncReport::default()
        };

        let mut pushed = Vec::new();
        for (index, event) in self.document.events.iter().enumerate() {
            let unsynced = event.source == EventSource::Local && event.external_uid.is_none();
            if unsynced && within(bounds, event.start_time.date()) {
                pushed.push((index, provider.push_event(event)?));
            }
        }
        let pulled = provider.pull_events(bounds)?;

        report.pushed = pushed.len();
        for (index, remote_id) in pushed {
            self.document.events[index].external_uid = remote_id;
        }

        let category_id = self.document.default_category_id().map(str::to_string);
        for remote in pulled {
            if let Err(e) = remote.validate() {
                tracing::warn!(
                    provider = provider.name(),
                    title = %remote.title,
                    "skipping remote event: {e}"
                );
                continue;
            }
            let uid = remote
                .external_uid
                .clone()
                .unwrap_or_else(|| remote.id.clone());
            match self
                .document
                .events
                .iter_mut()
                .find(|e| e.external_uid.as_deref() == Some(uid.as_str()))
            {
                Some(existing) => {
                    existing.title = remote.title;
                    existing.description = remote.description;
                    existing.location = remote.location;
                    existing.start_time = remote.start_time;
                    existing.end_time = remote.end_time;
                    report.updated += 1;
                }
                None => {
                    let mut event = Event::new(remote.title, remote.start_time, remote.end_time);
                    event.description = remote.description;
                    event.location = remote.location;
                    event.category_id = category_id.clone();
                    event.source = EventSource::Sync;
                    event.external_uid = Some(uid);
                    self.document.events.push(event);
                    report.pulled += 1;
                }
            }
        }

        tracing::info!(
            provider = %report.provider,
            pushed = report.pushed,
            pulled = report.pulled,
            updated = report.updated,
            "calendar synced"
        );
        self.persist("sync_calendar")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::super::testing::{date, session};
    use super::*;
    use crate::calendar::NoopSyncProvider;
    use crate::error::ValidationError;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date(2024, 8, 5).and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn events_require_valid_times_and_known_references() {
        let (_dir, mut session) = session();
        assert!(matches!(
            session.add_event(Event::new("Backwards", at(10, 0), at(9, 0))),
            Err(CoreError::Validation(ValidationError::InvalidTimeRange { .. }))
        ));

        let mut linked = Event::new("Linked", at(9, 0), at(10, 0));
        linked.task_id = Some("ghost".to_string());
        assert!(matches!(
            session.add_event(linked),
            Err(CoreError::NotFound { kind: EntityKind::Task, .. })
        ));

        let event = session.add_event(Event::new("Standup", at(9, 0), at(9, 15))).unwrap();
        let patch = EventPatch {
            end_time: Some(at(8, 0)),
            ..EventPatch::default()
        };
        assert!(session.update_event(&event.id, patch).is_err());
        assert_eq!(session.document().events[0].end_time, at(9, 15));
    }

    #[test]
    fn ics_roundtrip_skips_known_uids() {
        let (_dir, mut session) = session();
        session.add_event(Event::new("Lunch", at(12, 0), at(13, 0))).unwrap();
        let ics = session.export_ics(None);

        let report = session.import_ics(&ics).unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped.len(), 1);

        let foreign =
            "BEGIN:VEVENT\nUID:remote-7\nSUMMARY:Dinner\nDTSTART:20240805T190000\nEND:VEVENT\n";
        let report = session.import_ics(foreign).unwrap();
        assert_eq!(report.imported, 1);
        let imported = &session.document().events[1];
        assert_eq!(imported.source, EventSource::IcsImport);
        assert_eq!(imported.external_uid.as_deref(), Some("remote-7"));
        assert_eq!(imported.category_id.as_deref(), session.document().default_category_id());

        assert_eq!(session.import_ics(foreign).unwrap().imported, 0);
    }

    #[test]
    fn sync_requires_authentication() {
        let (_dir, mut session) = session();
        let provider = NoopSyncProvider::new();
        assert!(matches!(
            session.sync_calendar(&provider, None),
            Err(CoreError::Integration { .. })
        ));
    }

    struct FakeProvider {
        remote: Vec<Event>,
        pushed: RefCell<Vec<String>>,
    }

    impl CalendarSyncProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        fn is_authenticated(&self) -> bool {
            true
        }

        fn authenticate(&mut self, _: &str, _: &str, _: &str) -> Result<()> {
            Ok(())
        }

        fn pull_events(&self, _bounds: Option<&DateBounds>) -> Result<Vec<Event>> {
            Ok(self.remote.clone())
        }

        fn push_event(&self, event: &Event) -> Result<Option<String>> {
            self.pushed.borrow_mut().push(event.title.clone());
            Ok(Some(format!("remote-{}", event.title)))
        }
    }

    struct FlakyProvider {
        calls: RefCell<usize>,
    }

    impl CalendarSyncProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        fn is_authenticated(&self) -> bool {
            true
        }

        fn authenticate(&mut self, _: &str, _: &str, _: &str) -> Result<()> {
            Ok(())
        }

        fn push_event(&self, event: &Event) -> Result<Option<String>> {
            let mut calls = self.calls.borrow_mut();
            *calls += 1;
            if *calls == 2 {
                return Err(CoreError::Integration {
                    service: "flaky".to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(Some(format!("remote-{}", event.title)))
        }
    }

    #[test]
    fn failed_push_leaves_document_unchanged() {
        let (_dir, mut session) = session();
        session.add_event(Event::new("Gym", at(7, 0), at(8, 0))).unwrap();
        session.add_event(Event::new("Lunch", at(12, 0), at(13, 0))).unwrap();
        let provider = FlakyProvider {
            calls: RefCell::new(0),
        };

        assert!(matches!(
            session.sync_calendar(&provider, None),
            Err(CoreError::Integration { .. })
        ));
        assert!(session.document().events.iter().all(|e| e.external_uid.is_none()));
        assert!(session.store().load().events.iter().all(|e| e.external_uid.is_none()));
    }

    #[test]
    fn synced_events_are_not_pushed_again() {
        let (_dir, mut session) = session();
        session.add_event(Event::new("Gym", at(7, 0), at(8, 0))).unwrap();
        let provider = FakeProvider {
            remote: Vec::new(),
            pushed: RefCell::new(Vec::new()),
        };

        assert_eq!(session.sync_calendar(&provider, None).unwrap().pushed, 1);
        assert_eq!(session.sync_calendar(&provider, None).unwrap().pushed, 0);
        assert_eq!(provider.pushed.borrow().len(), 1);
        let stored = session.store().load();
        assert_eq!(stored.events[0].external_uid.as_deref(), Some("remote-Gym"));
    }

    #[test]
    fn sync_pushes_local_and_merges_remote() {
        let (_dir, mut session) = session();
        session.add_event(Event::new("Gym", at(7, 0), at(8, 0))).unwrap();

        let mut moved = Event::new("Gym (moved)", at(18, 0), at(19, 0));
        moved.external_uid = Some("remote-Gym".to_string());
        let mut fresh = Event::new("Dentist", at(15, 0), at(16, 0));
        fresh.external_uid = Some("remote-Dentist".to_string());
        let broken = Event::new("Broken", at(15, 0), at(14, 0));
        let provider = FakeProvider {
            remote: vec![moved, fresh, broken],
            pushed: RefCell::new(Vec::new()),
        };

        let report = session.sync_calendar(&provider, None).unwrap();
        assert_eq!(report.pushed, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(report.pulled, 1);
        assert_eq!(provider.pushed.borrow().as_slice(), ["Gym"]);

        let events = &session.document().events;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Gym (moved)");
        assert_eq!(events[0].start_time, at(18, 0));
        assert_eq!(events[1].source, EventSource::Sync);
    }
}
