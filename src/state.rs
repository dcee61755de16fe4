use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::color::EntityColors;
use crate::config::DashboardConfig;
use crate::data::aggregate::{
    cells_in, country_group, totals_by_entity, weekly_comparison, EntityTotal, WeekCell,
};
use crate::data::filter::{filter_records, DateRange, EntitySelector, FilterCriteria};
use crate::data::model::{FlightDataset, FlightRecord};
use crate::data::season::Season;
use crate::data::year_loader::YearLoader;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    /// Daily bars for the selected entity.
    Daily,
    /// Daily lines, several entities side by side.
    Timeline,
    /// Weekly ratio against 2019 per entity.
    HeatMap,
    /// Ranked per-entity totals.
    Totals,
}

impl ChartView {
    pub const ALL: [ChartView; 4] = [
        ChartView::Daily,
        ChartView::Timeline,
        ChartView::HeatMap,
        ChartView::Totals,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartView::Daily => "Daily flights",
            ChartView::Timeline => "Compare",
            ChartView::HeatMap => "vs 2019",
            ChartView::Totals => "Totals",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    loader: YearLoader,

    /// Year the user selected (may still be loading).
    pub year: String,

    /// Dataset on display; kept until a newer year finishes loading.
    pub dataset: Option<FlightDataset>,

    pub criteria: FilterCriteria,

    /// Records passing `criteria`, date-sorted (cached).
    pub visible: Vec<FlightRecord>,

    /// Per-entity totals over the season / range, all entities (cached).
    pub totals: Vec<EntityTotal>,

    /// Weekly 2019 comparison over the whole year (cached per dataset).
    pub weekly: Vec<WeekCell>,

    /// Country group shown in the heat map.
    pub heat_group: String,

    pub view: ChartView,

    pub entity_colors: EntityColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a year load is in flight.
    pub loading: bool,
}

impl AppState {
    /// Build the state and start loading the configured default year.
    pub fn new(config: DashboardConfig, loader: YearLoader) -> Self {
        let criteria = FilterCriteria {
            entity: EntitySelector::One(config.default_entity.clone()),
            season: config.default_season,
            range: None,
        };
        let year = config.default_year.clone();
        let mut state = Self {
            config,
            loader,
            year: String::new(),
            dataset: None,
            criteria,
            visible: Vec::new(),
            totals: Vec::new(),
            weekly: Vec::new(),
            heat_group: "All".to_string(),
            view: ChartView::Daily,
            entity_colors: EntityColors::default(),
            status_message: None,
            loading: false,
        };
        state.select_year(&year);
        state
    }

    /// Switch to another year. The current dataset stays visible until the
    /// new one arrives.
    pub fn select_year(&mut self, year: &str) {
        if !self.config.is_supported_year(year) {
            log::warn!("Ignoring unsupported year {year}");
            self.status_message = Some(format!("No data set for {year}"));
            return;
        }
        self.year = year.to_string();
        self.criteria.range = None;
        self.loading = true;
        self.loader.request(year);
    }

    /// Point at a different data directory and reload the current year.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        log::info!("Using data directory {}", dir.display());
        self.config.data_dir = dir;
        self.loader.set_source(Arc::new(self.config.source()));
        let year = self.year.clone();
        self.select_year(&year);
    }

    /// Pick up a finished load, if any. Returns `true` when the dataset changed.
    pub fn poll_loader(&mut self) -> bool {
        match self.loader.poll() {
            Some(ds) => {
                self.set_dataset(ds);
                true
            }
            None => false,
        }
    }

    /// Block until the pending load lands (headless callers and tests).
    pub fn wait_for_load(&mut self, timeout: Duration) -> bool {
        match self.loader.wait(timeout) {
            Some(ds) => {
                self.set_dataset(ds);
                true
            }
            None => false,
        }
    }

    /// Ingest a newly loaded dataset and re-derive everything cached.
    pub fn set_dataset(&mut self, dataset: FlightDataset) {
        self.status_message = if let Some(reason) = dataset.fetch_error() {
            Some(format!("No data for {}: {reason}", dataset.year()))
        } else if dataset.is_empty() {
            Some(format!("No valid rows for {}", dataset.year()))
        } else if dataset.rejected_rows() > 0 {
            Some(format!("{} malformed rows skipped", dataset.rejected_rows()))
        } else {
            None
        };

        self.criteria.entity = self.reconcile_entity(&dataset);
        self.entity_colors = EntityColors::new(dataset.entities());
        self.weekly = weekly_comparison(dataset.records());
        self.dataset = Some(dataset);
        self.loading = self.loader.is_pending();
        self.refilter();
    }

    /// Keep the entity selection meaningful for a new dataset.
    fn reconcile_entity(&self, dataset: &FlightDataset) -> EntitySelector {
        let fallback = || {
            if dataset.has_entity(&self.config.default_entity) {
                Some(self.config.default_entity.clone())
            } else {
                dataset.entities().first().cloned()
            }
        };
        match &self.criteria.entity {
            EntitySelector::All => EntitySelector::All,
            EntitySelector::One(name) if dataset.has_entity(name) => {
                EntitySelector::One(name.clone())
            }
            EntitySelector::One(_) => fallback().map_or(EntitySelector::All, EntitySelector::One),
            EntitySelector::Set(names) => {
                let mut kept: std::collections::BTreeSet<String> = names
                    .iter()
                    .filter(|n| dataset.has_entity(n))
                    .cloned()
                    .collect();
                if kept.is_empty() {
                    kept.extend(fallback());
                }
                EntitySelector::Set(kept)
            }
        }
    }

    /// Recompute cached views after a criteria change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible = filter_records(ds.records(), &self.criteria);

        let everyone = FilterCriteria {
            entity: EntitySelector::All,
            ..self.criteria.clone()
        };
        self.totals = totals_by_entity(&filter_records(ds.records(), &everyone));
    }

    pub fn set_entity(&mut self, entity: EntitySelector) {
        self.criteria.entity = entity;
        self.refilter();
    }

    /// Add or remove one entity from the comparison set.
    pub fn toggle_compared_entity(&mut self, entity: &str) {
        let mut set = match std::mem::take(&mut self.criteria.entity) {
            EntitySelector::Set(set) => set,
            EntitySelector::One(name) => [name].into(),
            EntitySelector::All => Default::default(),
        };
        if !set.remove(entity) {
            set.insert(entity.to_string());
        }
        self.set_entity(EntitySelector::Set(set));
    }

    pub fn set_season(&mut self, season: Season) {
        self.criteria.season = season;
        self.refilter();
    }

    /// Set or clear the explicit range; a range overrides the season.
    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.criteria.range = range;
        self.refilter();
    }

    /// 1 January to 31 December of the selected year.
    pub fn year_bounds(&self) -> Option<DateRange> {
        let year: i32 = self.year.parse().ok()?;
        Some(DateRange::new(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ))
    }

    /// Heat-map cells for the current season and country group.
    pub fn heat_cells(&self) -> Vec<WeekCell> {
        let group = country_group(&self.heat_group).unwrap_or_default();
        cells_in(&self.weekly, self.criteria.season, &group)
    }
}
