//! Section form screens, one per configurable area.

pub mod daemon;
pub mod ethernet;
pub mod modem;
pub mod wifi;

use std::sync::Arc;

use radgate_api::DeviceClient;
use radgate_config::AutofillMode;
use radgate_core::Section;

use crate::component::Component;

/// Create a fresh screen for a section.
///
/// Each section entry gets a brand-new form controller -- baselines never
/// survive navigation; only the persisted local profile does.
pub fn create_screen(
    section: Section,
    client: &Arc<DeviceClient>,
    autofill: AutofillMode,
) -> Box<dyn Component> {
    match section {
        Section::Wifi => {
            let profile = radgate_config::load_profiles().wifi.map(|p| p.settings);
            Box::new(wifi::WifiScreen::new(
                Arc::clone(client),
                autofill,
                profile,
            ))
        }
        Section::Ethernet => {
            let profile = radgate_config::load_profiles().ethernet.map(|p| p.settings);
            Box::new(ethernet::EthernetScreen::new(
                Arc::clone(client),
                autofill,
                profile,
            ))
        }
        Section::Modem => Box::new(modem::ModemScreen::new(Arc::clone(client))),
        Section::Daemon => Box::new(daemon::DaemonScreen::new(Arc::clone(client))),
    }
}
