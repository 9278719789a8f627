use iced_layershell::reexport::{
    Anchor, KeyboardInteractivity, Layer, NewLayerShellSettings, OutputOption,
};

use crate::app::EDGE_MARGIN;
use crate::bridge::ActiveSurface;

pub(crate) const PANEL_WIDTH: u32 = 420;
pub(crate) const PANEL_HEIGHT: u32 = 720;
/// Bell button plus room for the error banner underneath.
pub(crate) const TOGGLE_HEIGHT: u32 = 140;

fn make_output_option(output: Option<&str>) -> OutputOption {
    match output {
        Some(name) => OutputOption::OutputName(name.to_string()),
        None => OutputOption::None,
    }
}

fn size_for(surface: ActiveSurface) -> (u32, u32) {
    match surface {
        ActiveSurface::Toggle => (PANEL_WIDTH, TOGGLE_HEIGHT),
        ActiveSurface::Drawer | ActiveSurface::Inline => (PANEL_WIDTH, PANEL_HEIGHT),
    }
}

/// Layer settings for one surface kind, anchored to the top-right corner.
pub(crate) fn settings_for(surface: ActiveSurface, output: Option<&str>) -> NewLayerShellSettings {
    let margin = i32::from(EDGE_MARGIN);
    NewLayerShellSettings {
        layer: Layer::Overlay,
        anchor: Anchor::Top | Anchor::Right,
        keyboard_interactivity: match surface {
            ActiveSurface::Drawer => KeyboardInteractivity::OnDemand,
            ActiveSurface::Inline | ActiveSurface::Toggle => KeyboardInteractivity::None,
        },
        exclusive_zone: Some(-1),
        size: Some(size_for(surface)),
        margin: Some((margin, margin, 0, 0)),
        events_transparent: false,
        output_option: make_output_option(output),
        ..Default::default()
    }
}
