//! Presented state: the latest update for every rendered item.

use std::collections::{BTreeSet, HashMap};

use crate::core::telemetry::{
    GaugeGeometry, GaugeId, Point, Presenter, Series, TextField, TopProcesses, View, ViewUpdate,
};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    pub label: String,
    pub geometry: Option<GaugeGeometry>,
}

/// What the terminal currently shows, fed by the update loop.
#[derive(Debug, Default)]
pub struct Board {
    gauges: HashMap<GaugeId, GaugeView>,
    texts: HashMap<TextField, String>,
    sparklines: HashMap<Series, Vec<Point>>,
    processes: Option<TopProcesses>,
    core_count: usize,
    gpu_ids: BTreeSet<u32>,
}

impl Board {
    pub fn gauge(&self, gauge: GaugeId) -> Option<&GaugeView> {
        self.gauges.get(&gauge)
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        self.texts.get(&field).map(String::as_str)
    }

    pub fn sparkline(&self, series: Series) -> Option<&[Point]> {
        self.sparklines.get(&series).map(Vec::as_slice)
    }

    pub fn processes(&self) -> Option<&TopProcesses> {
        self.processes.as_ref()
    }

    pub fn core_count(&self) -> usize {
        self.core_count
    }

    pub fn gpu_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.gpu_ids.iter().copied()
    }
}

impl Board {
    /// The GPU status precedes the per-device updates of each GPU list, so
    /// devices missing from the new list are not drawn again.
    fn forget_gpus(&mut self) {
        self.gpu_ids.clear();
        self.gauges.retain(|gauge, _| !matches!(gauge, GaugeId::Gpu(_)));
        self.texts
            .retain(|field, _| !matches!(field, TextField::GpuDetail(_)));
        self.sparklines
            .retain(|series, _| !matches!(series, Series::GpuLoad(_)));
    }
}

impl Presenter for Board {
    fn present(&mut self, _view: View, update: ViewUpdate) -> Result<()> {
        match update {
            ViewUpdate::Gauge {
                gauge,
                label,
                geometry,
            } => {
                match gauge {
                    GaugeId::Core(core) => self.core_count = self.core_count.max(core + 1),
                    GaugeId::Gpu(id) => {
                        self.gpu_ids.insert(id);
                    }
                    _ => {}
                }
                self.gauges.insert(gauge, GaugeView { label, geometry });
            }
            ViewUpdate::Sparkline { series, points } => {
                self.sparklines.insert(series, points);
            }
            ViewUpdate::Text { field, text } => {
                if field == TextField::GpuStatus {
                    self.forget_gpus();
                }
                self.texts.insert(field, text);
            }
            ViewUpdate::Processes(top) => self.processes = Some(top),
        }
        Ok(())
    }
}
