use crate::config::CatalogConfig;
use crate::domain::model::{Plan, Quote, Zone};
use crate::utils::error::{AppError, Result};
use crate::utils::format;

/// 價格 = round(基本月費 × 方案倍率)，兩者都選了才有報價
pub fn compute_quote(zone: Option<&Zone>, plan: Option<&Plan>) -> Option<Quote> {
    let (zone, plan) = (zone?, plan?);
    let raw = f64::from(zone.base_price) * plan.multiplier;
    // 非負輸入下 f64::round 即為四捨五入
    let price = raw.max(0.0).round() as u32;
    Some(Quote {
        zone: zone.clone(),
        plan: plan.clone(),
        price,
    })
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    zones: Vec<Zone>,
    plans: Vec<Plan>,
}

impl Catalog {
    pub fn new(zones: Vec<Zone>, plans: Vec<Plan>) -> Self {
        Self { zones, plans }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.zones.clone(), config.plans.clone())
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn plan(&self, id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }
}

/// 目前選擇的區域與方案，各自可為空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub zone_id: Option<String>,
    pub plan_id: Option<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.zone_id.is_none() && self.plan_id.is_none()
    }
}

/// None 與空字串（未選擇）視為相同
fn normalize(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZonePanel {
    pub name: String,
    pub distance: String,
    pub price: String,
}

impl From<&Zone> for ZonePanel {
    fn from(zone: &Zone) -> Self {
        Self {
            name: zone.name.clone(),
            distance: format!("Distance: {}", zone.distance),
            price: format::format_monthly(i64::from(zone.base_price)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanPanel {
    pub name: String,
    pub description: String,
    pub badge: String,
    pub features: Vec<String>,
}

impl From<&Plan> for PlanPanel {
    fn from(plan: &Plan) -> Self {
        Self {
            name: plan.name.clone(),
            description: plan.description.clone(),
            badge: format!("{}x", plan.multiplier),
            features: plan.features.clone(),
        }
    }
}

/// 空白提示與報價兩者擇一顯示
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteDisplay {
    Empty,
    Priced(Quote),
}

impl QuoteDisplay {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            QuoteDisplay::Priced(quote) => Some(quote),
            QuoteDisplay::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QuoteDisplay::Empty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingView {
    pub zone: Option<ZonePanel>,
    pub plan: Option<PlanPanel>,
    pub display: QuoteDisplay,
}

#[derive(Debug, Clone)]
pub struct PricingCalculator {
    catalog: Catalog,
    selection: Selection,
}

impl PricingCalculator {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_zone(&mut self, id: Option<&str>) -> Result<PricingView> {
        let zone_id = match normalize(id) {
            Some(id) => {
                let zone = self
                    .catalog
                    .zone(id)
                    .ok_or_else(|| AppError::UnknownZone(id.to_string()))?;
                Some(zone.id.clone())
            }
            None => None,
        };
        self.selection.zone_id = zone_id;
        Ok(self.render())
    }

    pub fn select_plan(&mut self, id: Option<&str>) -> Result<PricingView> {
        let plan_id = match normalize(id) {
            Some(id) => {
                let plan = self
                    .catalog
                    .plan(id)
                    .ok_or_else(|| AppError::UnknownPlan(id.to_string()))?;
                Some(plan.id.clone())
            }
            None => None,
        };
        self.selection.plan_id = plan_id;
        Ok(self.render())
    }

    pub fn reset(&mut self) -> PricingView {
        self.selection = Selection::default();
        self.render()
    }

    fn selected_zone(&self) -> Option<&Zone> {
        self.selection
            .zone_id
            .as_deref()
            .and_then(|id| self.catalog.zone(id))
    }

    fn selected_plan(&self) -> Option<&Plan> {
        self.selection
            .plan_id
            .as_deref()
            .and_then(|id| self.catalog.plan(id))
    }

    pub fn quote(&self) -> Option<Quote> {
        compute_quote(self.selected_zone(), self.selected_plan())
    }

    pub fn render(&self) -> PricingView {
        let display = match self.quote() {
            Some(quote) => QuoteDisplay::Priced(quote),
            None => QuoteDisplay::Empty,
        };
        PricingView {
            zone: self.selected_zone().map(ZonePanel::from),
            plan: self.selected_plan().map(PlanPanel::from),
            display,
        }
    }
}
