// ── Baseline & diff engine ──
//
// Each form tracks the last server-confirmed state of its section. The
// baseline gates the save action: no difference, no save. An absent
// baseline (the server sent nothing recognizable) relaxes the gate to
// "always allow".

use crate::section::SectionModel;

/// Last-known server-confirmed state for one section.
///
/// Owned by a per-section form controller; created fresh on section entry
/// and discarded on exit. Never a process-wide singleton.
#[derive(Debug, Clone, Default)]
pub struct Baseline<M> {
    inner: Option<M>,
}

impl<M: SectionModel> Baseline<M> {
    pub fn new() -> Self {
        Self { inner: None }
    }

    /// Whether a server baseline has been established.
    pub fn is_established(&self) -> bool {
        self.inner.is_some()
    }

    pub fn get(&self) -> Option<&M> {
        self.inner.as_ref()
    }

    /// Install a confirmed server state.
    pub fn establish(&mut self, model: M) {
        self.inner = Some(model);
    }

    /// Drop the baseline (section reload produced no data).
    pub fn clear(&mut self) {
        self.inner = None;
    }

    /// Whether saving `current` is permitted: always when no baseline is
    /// established, otherwise only when the edit actually differs.
    pub fn permits_save(&self, current: &M) -> bool {
        self.inner.as_ref().is_none_or(|b| b.differs(current))
    }

    /// Record a successful save: the baseline becomes exactly the payload
    /// just submitted -- no round trip to re-fetch. The device never echoes
    /// credentials back, so this is the only way the UI can settle to
    /// "no pending changes" immediately.
    pub fn commit(&mut self, submitted: M) {
        self.inner = Some(submitted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{SectionModel, WifiSettings};

    fn wifi(ssid: &str, password: &str) -> WifiSettings {
        WifiSettings {
            mode: Some("client".into()),
            ssid: Some(ssid.into()),
            password: Some(password.into()),
            ip_config: Some("dhcp".into()),
            ip: Some(String::new()),
            netmask: Some(String::new()),
            gateway: Some(String::new()),
            dns1: Some(String::new()),
            dns2: Some(String::new()),
        }
    }

    #[test]
    fn absent_baseline_always_permits_save() {
        let baseline: Baseline<WifiSettings> = Baseline::new();
        assert!(baseline.permits_save(&wifi("HomeNet", "")));
    }

    #[test]
    fn unchanged_form_does_not_permit_save() {
        let mut baseline = Baseline::new();
        baseline.establish(wifi("HomeNet", ""));
        assert!(!baseline.permits_save(&wifi("HomeNet", "")));
        assert!(baseline.permits_save(&wifi("OtherNet", "")));
    }

    #[test]
    fn commit_installs_submitted_payload_exactly() {
        let mut baseline = Baseline::new();
        baseline.establish(wifi("HomeNet", ""));

        // Credential included even though the server would never echo it.
        let submitted = wifi("HomeNet", "s3cr3t12");
        baseline.commit(submitted.clone());

        assert!(!baseline.get().expect("baseline").differs(&submitted));
        assert!(!baseline.permits_save(&submitted));
    }

    #[test]
    fn commit_establishes_a_previously_absent_baseline() {
        let mut baseline = Baseline::new();
        let submitted = wifi("HomeNet", "s3cr3t12");
        baseline.commit(submitted.clone());
        assert!(baseline.is_established());
        assert!(!baseline.permits_save(&submitted));
    }
}
