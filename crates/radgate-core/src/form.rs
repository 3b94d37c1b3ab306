// ── Per-section form session ──
//
// One session per visible form, created on section entry and discarded on
// exit. The session owns the baseline and the save gate; field editing and
// rendering stay in the UI layer.

use tracing::debug;

use crate::baseline::Baseline;
use crate::section::SectionModel;

/// Baseline ownership + save gating for one section form.
#[derive(Debug, Clone, Default)]
pub struct FormSession<M> {
    baseline: Baseline<M>,
}

impl<M: SectionModel> FormSession<M> {
    pub fn new() -> Self {
        Self {
            baseline: Baseline::new(),
        }
    }

    /// Seed from a completed load. `extracted` (pre-defaults) decides
    /// whether the server provided anything recognizable; `rendered` is
    /// the value stored as the comparison point (render defaults applied,
    /// matching what the form shows).
    pub fn seed(&mut self, extracted: &M, rendered: M) {
        if extracted.has_server_data() {
            self.baseline.establish(rendered);
        } else {
            debug!("no recognizable server data -- baseline absent");
            self.baseline.clear();
        }
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_established()
    }

    pub fn baseline(&self) -> Option<&M> {
        self.baseline.get()
    }

    /// Whether the save action should be enabled for the current edit.
    pub fn permits_save(&self, current: &M) -> bool {
        self.baseline.permits_save(current)
    }

    /// Record a successful save.
    pub fn commit(&mut self, submitted: M) {
        self.baseline.commit(submitted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::EthernetSettings;

    #[test]
    fn seed_without_server_data_leaves_gate_open() {
        let mut session: FormSession<EthernetSettings> = FormSession::new();
        let extracted = EthernetSettings::default();
        let rendered = extracted.with_render_defaults();
        session.seed(&extracted, rendered.clone());

        assert!(!session.has_baseline());
        assert!(session.permits_save(&rendered));
    }

    #[test]
    fn seed_with_server_data_closes_gate_until_edit() {
        let mut session = FormSession::new();
        let extracted = EthernetSettings {
            ip_config: Some("dhcp".into()),
            ..EthernetSettings::default()
        };
        let rendered = extracted.with_render_defaults();
        session.seed(&extracted, rendered.clone());

        assert!(session.has_baseline());
        assert!(!session.permits_save(&rendered));

        let mut edited = rendered;
        edited.ip_config = Some("static".into());
        assert!(session.permits_save(&edited));
    }

    #[test]
    fn commit_closes_gate_on_submitted_payload() {
        let mut session = FormSession::new();
        let extracted = EthernetSettings {
            ip_config: Some("dhcp".into()),
            ..EthernetSettings::default()
        };
        session.seed(&extracted, extracted.with_render_defaults());

        let mut submitted = extracted.with_render_defaults();
        submitted.ip_config = Some("static".into());
        submitted.ip = Some("192.168.1.10".into());
        submitted.netmask = Some("255.255.255.0".into());

        session.commit(submitted.clone());
        assert!(!session.permits_save(&submitted));
    }
}
