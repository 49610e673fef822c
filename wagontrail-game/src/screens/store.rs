//! General store window and shopping cart.
//!
//! Purchases accumulate in a [`Cart`]; nothing touches the wagon until the
//! player leaves and the window's removal hook settles the bill.
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::constants::STORE_PRICE_STEP_PCT;
use crate::content::PriceEntry;
use crate::error::GameError;
use crate::inventory::{Entity, format_cents};
use crate::simulation::Simulation;
use crate::window::{Form, FormKind, FormRegistry, FormView, WindowContext, WindowKind, WindowState};

/// Price at a store `stops` locations down the trail; prices climb the
/// further west the party gets.
#[must_use]
pub fn store_price(base_cents: i64, stops: usize) -> i64 {
    let stops = i64::try_from(stops).unwrap_or(i64::MAX);
    let markup = base_cents
        .saturating_mul(STORE_PRICE_STEP_PCT)
        .saturating_mul(stops)
        / 100;
    base_cents.saturating_add(markup)
}

/// A line item in the shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub entity: Entity,
    pub name: String,
    /// Purchased units, each adding `bundle` to the inventory.
    pub quantity: i32,
    pub bundle: i32,
    pub unit_cents: i64,
}

impl CartLine {
    #[must_use]
    pub fn cost_cents(&self) -> i64 {
        i64::from(self.quantity) * self.unit_cents
    }

    /// Inventory units this line adds.
    #[must_use]
    pub const fn units(&self) -> i32 {
        self.quantity.saturating_mul(self.bundle)
    }
}

/// Shopping cart state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    /// Total cost in cents (updated when cart changes)
    pub total_cents: i64,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn find_line(&self, entity: Entity) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.entity == entity)
    }

    /// Replace the quantity for an entity; zero removes the line.
    pub fn set_line(&mut self, line: CartLine) {
        self.lines.retain(|existing| existing.entity != line.entity);
        if line.quantity > 0 {
            self.lines.push(line);
            self.lines.sort_by_key(|line| line.entity);
        }
        self.recalc();
    }

    pub fn remove_all_item(&mut self, entity: Entity) {
        self.lines.retain(|line| line.entity != entity);
        self.recalc();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.total_cents = 0;
    }

    #[must_use]
    pub fn get_quantity(&self, entity: Entity) -> i32 {
        self.find_line(entity).map_or(0, |line| line.quantity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total of every line except `entity`'s.
    #[must_use]
    pub fn total_without(&self, entity: Entity) -> i64 {
        self.lines
            .iter()
            .filter(|line| line.entity != entity)
            .map(CartLine::cost_cents)
            .sum()
    }

    fn recalc(&mut self) {
        self.total_cents = self.lines.iter().map(CartLine::cost_cents).sum();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub cart: Cart,
    /// Entity the BuyItem form is asking about.
    pub selected: Option<Entity>,
    /// Locations already passed; drives the price markup.
    pub stops: usize,
    pub error: Option<String>,
}

impl Store {
    fn unit_price(&self, entry: &PriceEntry) -> i64 {
        store_price(entry.price_cents, self.stops)
    }

    /// Largest quantity of `entry` the player may order right now.
    fn max_order(&self, entry: &PriceEntry, sim: &Simulation) -> i32 {
        let inventory = &sim.world.vehicle.inventory;
        let by_space = entry.max_purchase(inventory.quantity(entry.entity));
        let remaining = inventory.cash_cents() - self.cart.total_without(entry.entity);
        let unit = self.unit_price(entry).max(1);
        let by_cash = i32::try_from((remaining / unit).max(0)).unwrap_or(i32::MAX);
        by_space.min(by_cash)
    }

    fn rebuild_menu(ctx: &mut WindowContext<'_, Self>) {
        ctx.menu.clear();
        for entry in &ctx.sim.content().prices {
            let entity = entry.entity;
            let pending = ctx.data.cart.get_quantity(entity);
            let label = if pending > 0 {
                let total = ctx.data.unit_price(entry) * i64::from(pending);
                format!("{} ({pending} {}, {})", entry.name, entry.unit, format_cents(total))
            } else {
                format!(
                    "{} ({} per {})",
                    entry.name,
                    format_cents(ctx.data.unit_price(entry)),
                    entry.unit
                )
            };
            ctx.menu.add(entity.buy_command(), label, move |ctx| {
                ctx.data.selected = Some(entity);
                ctx.data.error = None;
                ctx.set_form(FormKind::BuyItem);
                Ok(())
            });
        }
        ctx.menu.add("LeaveStore", "Leave store", |ctx| {
            ctx.remove_window();
            Ok(())
        });
    }
}

impl WindowState for Store {
    const KIND: WindowKind = WindowKind::Store;

    fn create(sim: &Simulation) -> Self {
        Self {
            cart: Cart::new(),
            selected: None,
            stops: sim.world.trail.index(),
            error: None,
        }
    }

    fn forms() -> FormRegistry<Self> {
        FormRegistry::new().with(FormKind::BuyItem, BuyItem::build)
    }

    fn header(&self, sim: &Simulation) -> String {
        let mut out = format!(
            "{} General Store\n{}\n--------------------------------\n",
            sim.world.trail.current().name,
            sim.world.calendar
        );
        for line in &self.cart.lines {
            let _ = writeln!(out, "  {:<14}{:>10}", line.name, format_cents(line.cost_cents()));
        }
        let cash = sim.world.vehicle.inventory.cash_cents();
        let _ = writeln!(out, "  Total bill:   {:>10}", format_cents(self.cart.total_cents));
        let _ = writeln!(out, "  You have:     {:>10}", format_cents(cash - self.cart.total_cents));
        out.push_str("--------------------------------\n");
        out
    }

    fn on_post_create(ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        Self::rebuild_menu(ctx);
        Ok(())
    }

    fn on_form_change(ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        Self::rebuild_menu(ctx);
        Ok(())
    }

    /// Settle the bill. Lines the wagon cannot hold or pay for are skipped.
    fn on_removed(&mut self, sim: &mut Simulation) {
        let inventory = &mut sim.world.vehicle.inventory;
        for line in &self.cart.lines {
            if let Err(err) = inventory.spend(line.cost_cents()) {
                warn!("store: skipping {}: {err}", line.name);
                continue;
            }
            if let Err(err) = inventory.add(line.entity, line.units()) {
                warn!("store: refunding {}: {err}", line.name);
                inventory.set_cash_cents(inventory.cash_cents() + line.cost_cents());
            }
        }
        info!(
            "store: settled {} with {} left",
            format_cents(self.cart.total_cents),
            format_cents(inventory.cash_cents())
        );
        self.cart.clear();
    }
}

/// Prompts for a quantity of the selected supply.
#[derive(Debug)]
struct BuyItem {
    entity: Entity,
}

impl BuyItem {
    fn build(view: FormView<'_, Store>) -> Box<dyn Form<Store>> {
        Box::new(Self {
            entity: view.data.selected.unwrap_or(Entity::Food),
        })
    }
}

impl Form<Store> for BuyItem {
    fn kind(&self) -> FormKind {
        FormKind::BuyItem
    }

    fn render(&self, view: FormView<'_, Store>) -> String {
        let Some(entry) = view.sim.content().price(self.entity) else {
            return String::from("That is not for sale here.");
        };
        let max = view.data.max_order(entry, view.sim);
        let mut out = format!(
            "{} cost {} per {}.\nHow many {}s? (0-{max}, blank to cancel)",
            entry.name,
            format_cents(view.data.unit_price(entry)),
            entry.unit,
            entry.unit
        );
        if let Some(error) = &view.data.error {
            out.push('\n');
            out.push_str(error);
        }
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Store>,
        input: &str,
    ) -> Result<(), GameError> {
        let input = input.trim();
        if input.is_empty() {
            ctx.clear_form();
            return Ok(());
        }
        let Some(entry) = ctx.sim.content().price(self.entity) else {
            ctx.clear_form();
            return Ok(());
        };
        let Ok(quantity) = input.parse::<i32>() else {
            ctx.data.error = Some(format!("\"{input}\" is not a number."));
            return Ok(());
        };
        let max = ctx.data.max_order(entry, ctx.sim);
        if !(0..=max).contains(&quantity) {
            ctx.data.error = Some(format!("You can buy at most {max}."));
            return Ok(());
        }
        let line = CartLine {
            entity: entry.entity,
            name: entry.name.clone(),
            quantity,
            bundle: entry.bundle.max(1),
            unit_cents: ctx.data.unit_price(entry),
        };
        ctx.data.cart.set_line(line);
        ctx.data.error = None;
        ctx.data.selected = None;
        ctx.clear_form();
        Ok(())
    }
}
