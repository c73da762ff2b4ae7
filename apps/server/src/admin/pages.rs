//! View models for the admin list and detail pages.

use serde::Serialize;

use btmirror_core::customers::{Address, Customer};
use btmirror_core::errors::Error as CoreError;
use btmirror_core::payment_methods::CreditCard;
use btmirror_core::plans::{AddOn, Discount, Plan};
use btmirror_core::subscriptions::{Subscription, SubscriptionHistory, SubscriptionModifier};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

const EMPTY: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Customers,
    CreditCards,
    Plans,
    AddOns,
    Discounts,
    Subscriptions,
}

impl Entity {
    pub const ALL: [Entity; 6] = [
        Entity::Customers,
        Entity::CreditCards,
        Entity::Plans,
        Entity::AddOns,
        Entity::Discounts,
        Entity::Subscriptions,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::CreditCards => "credit-cards",
            Self::Plans => "plans",
            Self::AddOns => "add-ons",
            Self::Discounts => "discounts",
            Self::Subscriptions => "subscriptions",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Customers => "Customers",
            Self::CreditCards => "Credit cards",
            Self::Plans => "Plans",
            Self::AddOns => "Add-ons",
            Self::Discounts => "Discounts",
            Self::Subscriptions => "Subscriptions",
        }
    }

    pub fn from_slug(slug: &str) -> ApiResult<Self> {
        Self::ALL
            .into_iter()
            .find(|entity| entity.slug() == slug)
            .ok_or_else(|| ApiError::NotFound(format!("No admin page for '{}'", slug)))
    }

    fn href(&self, id: &str) -> String {
        format!("/admin/{}/{}", self.slug(), urlencoding::encode(id))
    }
}

#[derive(Debug, Serialize)]
pub struct Cell {
    text: String,
    href: Option<String>,
}

impl Cell {
    fn text(value: impl ToString) -> Self {
        Self {
            text: value.to_string(),
            href: None,
        }
    }

    fn opt<T: ToString>(value: Option<T>) -> Self {
        value.map_or_else(Self::empty, Self::text)
    }

    fn flag(value: bool) -> Self {
        Self::text(if value { "yes" } else { "no" })
    }

    fn link(entity: Entity, id: &str, label: impl ToString) -> Self {
        Self {
            text: label.to_string(),
            href: Some(entity.href(id)),
        }
    }

    fn empty() -> Self {
        Self::text(EMPTY)
    }
}

#[derive(Debug, Serialize)]
pub struct Row {
    href: String,
    cells: Vec<Cell>,
}

#[derive(Debug, Serialize)]
pub struct ListPage {
    slug: &'static str,
    title: &'static str,
    columns: Vec<&'static str>,
    rows: Vec<Row>,
}

#[derive(Debug, Serialize)]
pub struct Field {
    label: &'static str,
    value: Cell,
}

#[derive(Debug, Serialize)]
pub struct Section {
    title: Option<&'static str>,
    fields: Vec<Field>,
}

/// A tabular block of related rows below the main record.
#[derive(Debug, Serialize)]
pub struct Inline {
    title: &'static str,
    columns: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Serialize)]
pub struct DetailPage {
    slug: &'static str,
    title: &'static str,
    heading: String,
    sections: Vec<Section>,
    inlines: Vec<Inline>,
}

fn field(label: &'static str, value: Cell) -> Field {
    Field { label, value }
}

pub fn list_page(state: &AppState, entity: Entity) -> ApiResult<ListPage> {
    let (columns, rows): (Vec<&'static str>, Vec<Row>) = match entity {
        Entity::Customers => (
            vec!["email", "phone"],
            state
                .customer_service
                .list_customers()?
                .into_iter()
                .map(|c| Row {
                    href: entity.href(&c.id),
                    cells: vec![Cell::opt(c.email), Cell::opt(c.phone)],
                })
                .collect(),
        ),
        Entity::CreditCards => (
            vec![
                "customer",
                "bin",
                "card_type",
                "expiration_date",
                "expiration_month",
                "expiration_year",
                "masked_number",
            ],
            state
                .payment_method_service
                .list_credit_cards()?
                .into_iter()
                .map(|card| Row {
                    href: entity.href(&card.token),
                    cells: vec![
                        Cell::link(Entity::Customers, &card.customer_id, &card.customer_id),
                        Cell::text(card.bin),
                        Cell::text(card.card_type),
                        Cell::text(card.expiration_date),
                        Cell::text(card.expiration_month),
                        Cell::text(card.expiration_year),
                        Cell::text(card.masked_number),
                    ],
                })
                .collect(),
        ),
        Entity::Plans => (
            vec!["name", "price", "billing_frequency"],
            state
                .plan_service
                .list_plans()?
                .into_iter()
                .map(|plan| Row {
                    href: entity.href(&plan.id),
                    cells: vec![
                        Cell::text(plan.name),
                        Cell::text(plan.price),
                        Cell::text(plan.billing_frequency),
                    ],
                })
                .collect(),
        ),
        Entity::AddOns => (
            vec!["id", "name", "amount", "never_expires"],
            state
                .plan_service
                .list_add_ons()?
                .into_iter()
                .map(|a| Row {
                    href: entity.href(&a.id),
                    cells: vec![
                        Cell::text(&a.id),
                        Cell::text(a.name),
                        Cell::text(a.amount),
                        Cell::flag(a.never_expires),
                    ],
                })
                .collect(),
        ),
        Entity::Discounts => (
            vec!["id", "name", "amount", "never_expires"],
            state
                .plan_service
                .list_discounts()?
                .into_iter()
                .map(|d| Row {
                    href: entity.href(&d.id),
                    cells: vec![
                        Cell::text(&d.id),
                        Cell::text(d.name),
                        Cell::text(d.amount),
                        Cell::flag(d.never_expires),
                    ],
                })
                .collect(),
        ),
        Entity::Subscriptions => (
            vec![
                "id",
                "payment_method",
                "plan",
                "days_past_due",
                "next_billing_date",
            ],
            state
                .subscription_service
                .list_subscriptions()?
                .into_iter()
                .map(|s| Row {
                    href: entity.href(&s.id),
                    cells: vec![
                        Cell::text(&s.id),
                        s.payment_method_token
                            .as_deref()
                            .map_or_else(Cell::empty, |token| {
                                Cell::link(Entity::CreditCards, token, token)
                            }),
                        Cell::link(Entity::Plans, &s.plan_id, &s.plan_id),
                        Cell::opt(s.days_past_due),
                        Cell::text(s.next_billing_date),
                    ],
                })
                .collect(),
        ),
    };

    Ok(ListPage {
        slug: entity.slug(),
        title: entity.title(),
        columns,
        rows,
    })
}

pub fn detail_page(state: &AppState, entity: Entity, id: &str) -> ApiResult<DetailPage> {
    let (heading, sections, inlines) = match entity {
        Entity::Customers => customer_detail(state, id)?,
        Entity::CreditCards => credit_card_detail(state, id)?,
        Entity::Plans => plan_detail(state, id)?,
        Entity::AddOns => {
            let add_on = state.plan_service.get_add_on(id)?;
            (add_on.name.clone(), vec![add_on_section(&add_on)], Vec::new())
        }
        Entity::Discounts => {
            let discount = state.plan_service.get_discount(id)?;
            (
                discount.name.clone(),
                vec![discount_section(&discount)],
                Vec::new(),
            )
        }
        Entity::Subscriptions => subscription_detail(state, id)?,
    };

    Ok(DetailPage {
        slug: entity.slug(),
        title: entity.title(),
        heading,
        sections,
        inlines,
    })
}

type Detail = (String, Vec<Section>, Vec<Inline>);

fn customer_detail(state: &AppState, id: &str) -> ApiResult<Detail> {
    let customer: Customer = state.customer_service.get_customer(id)?;
    let addresses = state.customer_service.list_addresses(id)?;
    let cards = state.payment_method_service.list_for_customer(id)?;

    let general = Section {
        title: None,
        fields: vec![
            field("id", Cell::text(&customer.id)),
            field("first_name", Cell::opt(customer.first_name.as_deref())),
            field("last_name", Cell::opt(customer.last_name.as_deref())),
            field("company", Cell::opt(customer.company.as_deref())),
            field("email", Cell::opt(customer.email.as_deref())),
            field("phone", Cell::opt(customer.phone.as_deref())),
            field("fax", Cell::opt(customer.fax.as_deref())),
            field("website", Cell::opt(customer.website.as_deref())),
            field("created_at", Cell::text(customer.created_at)),
            field("updated_at", Cell::text(customer.updated_at)),
        ],
    };

    Ok((
        customer.display_name(),
        vec![general],
        vec![address_inline(&addresses), card_inline(&cards)],
    ))
}

fn address_inline(addresses: &[Address]) -> Inline {
    Inline {
        title: "Addresses",
        columns: vec![
            "id",
            "first_name",
            "last_name",
            "street_address",
            "extended_address",
            "locality",
            "region",
            "postal_code",
            "country_code_alpha2",
        ],
        rows: addresses
            .iter()
            .map(|a| {
                vec![
                    Cell::text(&a.id),
                    Cell::opt(a.first_name.as_deref()),
                    Cell::opt(a.last_name.as_deref()),
                    Cell::opt(a.street_address.as_deref()),
                    Cell::opt(a.extended_address.as_deref()),
                    Cell::opt(a.locality.as_deref()),
                    Cell::opt(a.region.as_deref()),
                    Cell::opt(a.postal_code.as_deref()),
                    Cell::opt(a.country_code_alpha2.as_deref()),
                ]
            })
            .collect(),
    }
}

fn card_inline(cards: &[CreditCard]) -> Inline {
    Inline {
        title: "Credit cards",
        columns: vec!["token", "card_type", "masked_number", "default", "expired"],
        rows: cards
            .iter()
            .map(|card| {
                vec![
                    Cell::link(Entity::CreditCards, &card.token, &card.token),
                    Cell::text(&card.card_type),
                    Cell::text(&card.masked_number),
                    Cell::flag(card.default),
                    Cell::flag(card.expired),
                ]
            })
            .collect(),
    }
}

fn credit_card_detail(state: &AppState, token: &str) -> ApiResult<Detail> {
    let card = state.payment_method_service.get_credit_card(token)?;
    let general = Section {
        title: None,
        fields: vec![
            field("token", Cell::text(&card.token)),
            field(
                "customer",
                Cell::link(Entity::Customers, &card.customer_id, &card.customer_id),
            ),
            field(
                "billing_address",
                Cell::opt(card.billing_address_id.as_deref()),
            ),
            field("bin", Cell::text(&card.bin)),
            field("card_type", Cell::text(&card.card_type)),
            field(
                "cardholder_name",
                Cell::opt(card.cardholder_name.as_deref()),
            ),
            field("commercial", Cell::text(card.commercial)),
            field("country_of_issuance", Cell::text(&card.country_of_issuance)),
            field("customer_location", Cell::text(card.customer_location)),
            field("debit", Cell::text(card.debit)),
            field("default", Cell::flag(card.default)),
            field("expiration_date", Cell::text(&card.expiration_date)),
            field("expired", Cell::flag(card.expired)),
            field("healthcare", Cell::text(card.healthcare)),
            field("image_url", Cell::text(&card.image_url)),
            field("issuing_bank", Cell::text(&card.issuing_bank)),
            field("last_4", Cell::text(&card.last_4)),
            field("masked_number", Cell::text(&card.masked_number)),
            field("payroll", Cell::text(card.payroll)),
            field("prepaid", Cell::text(card.prepaid)),
            field(
                "unique_number_identifier",
                Cell::text(&card.unique_number_identifier),
            ),
            field("created_at", Cell::text(card.created_at)),
            field("updated_at", Cell::text(card.updated_at)),
        ],
    };

    Ok((card.masked_number.clone(), vec![general], Vec::new()))
}

fn plan_detail(state: &AppState, id: &str) -> ApiResult<Detail> {
    let plan: Plan = state.plan_service.get_plan(id)?;
    let add_on_ids = state.plan_service.plan_add_on_ids(id)?;
    let discount_ids = state.plan_service.plan_discount_ids(id)?;

    let general = Section {
        title: None,
        fields: vec![
            field("id", Cell::text(&plan.id)),
            field("name", Cell::text(&plan.name)),
            field("description", Cell::opt(plan.description.as_deref())),
            field("price", Cell::text(plan.price)),
            field(
                "currency_iso_code",
                Cell::opt(plan.currency_iso_code.as_deref()),
            ),
            field("billing_frequency", Cell::text(plan.billing_frequency)),
            field("billing_day_of_month", Cell::opt(plan.billing_day_of_month)),
            field(
                "number_of_billing_cycles",
                Cell::opt(plan.number_of_billing_cycles),
            ),
            field("created_at", Cell::text(plan.created_at)),
            field("updated_at", Cell::text(plan.updated_at)),
        ],
    };
    let trial = Section {
        title: Some("Trial"),
        fields: vec![
            field("trial_duration", Cell::opt(plan.trial_duration)),
            field("trial_duration_unit", Cell::opt(plan.trial_duration_unit)),
            field("trial_period", Cell::flag(plan.trial_period)),
        ],
    };
    let links = |title, entity: Entity, ids: Vec<String>| Inline {
        title,
        columns: vec!["id"],
        rows: ids
            .iter()
            .map(|id| vec![Cell::link(entity, id, id)])
            .collect(),
    };

    Ok((
        plan.name.clone(),
        vec![general, trial],
        vec![
            links("Add-ons", Entity::AddOns, add_on_ids),
            links("Discounts", Entity::Discounts, discount_ids),
        ],
    ))
}

fn add_on_section(add_on: &AddOn) -> Section {
    Section {
        title: None,
        fields: vec![
            field("id", Cell::text(&add_on.id)),
            field("name", Cell::text(&add_on.name)),
            field("description", Cell::opt(add_on.description.as_deref())),
            field("amount", Cell::text(add_on.amount)),
            field("never_expires", Cell::flag(add_on.never_expires)),
            field(
                "number_of_billing_cycles",
                Cell::opt(add_on.number_of_billing_cycles),
            ),
        ],
    }
}

fn discount_section(discount: &Discount) -> Section {
    Section {
        title: None,
        fields: vec![
            field("id", Cell::text(&discount.id)),
            field("name", Cell::text(&discount.name)),
            field("description", Cell::opt(discount.description.as_deref())),
            field("amount", Cell::text(discount.amount)),
            field("never_expires", Cell::flag(discount.never_expires)),
            field(
                "number_of_billing_cycles",
                Cell::opt(discount.number_of_billing_cycles),
            ),
        ],
    }
}

/// Customer owning the subscription's card, if the card is mirrored.
fn subscription_customer(state: &AppState, token: Option<&str>) -> ApiResult<Cell> {
    let Some(token) = token else {
        return Ok(Cell::empty());
    };
    let card = match state.payment_method_service.get_credit_card(token) {
        Ok(card) => card,
        Err(CoreError::NotFound { .. }) => return Ok(Cell::empty()),
        Err(err) => return Err(err.into()),
    };
    let customer = state.customer_service.get_customer(&card.customer_id)?;
    Ok(Cell::link(
        Entity::Customers,
        &customer.id,
        customer.display_name(),
    ))
}

fn modifier_inline(title: &'static str, entity: Entity, rows: &[SubscriptionModifier]) -> Inline {
    Inline {
        title,
        columns: vec![
            "modifier",
            "name",
            "amount",
            "quantity",
            "current_billing_cycle",
            "never_expires",
            "number_of_billing_cycles",
        ],
        rows: rows
            .iter()
            .map(|m| {
                vec![
                    Cell::link(entity, &m.modifier_id, &m.modifier_id),
                    Cell::text(&m.name),
                    Cell::text(m.amount),
                    Cell::text(m.quantity),
                    Cell::text(m.current_billing_cycle),
                    Cell::flag(m.never_expires),
                    Cell::opt(m.number_of_billing_cycles),
                ]
            })
            .collect(),
    }
}

fn history_inline(history: &[SubscriptionHistory]) -> Inline {
    Inline {
        title: "Status history",
        columns: vec!["timestamp", "status", "price", "balance", "subscription_source"],
        rows: history
            .iter()
            .map(|h| {
                vec![
                    Cell::text(h.timestamp),
                    Cell::text(h.status),
                    Cell::text(h.price),
                    Cell::text(h.balance),
                    Cell::text(h.subscription_source),
                ]
            })
            .collect(),
    }
}

fn subscription_detail(state: &AppState, id: &str) -> ApiResult<Detail> {
    let service = &state.subscription_service;
    let s: Subscription = service.get_subscription(id)?;
    let add_ons = service.list_subscription_add_ons(id)?;
    let discounts = service.list_subscription_discounts(id)?;
    let history = service.list_history(id)?;
    let token = s.payment_method_token.as_deref();

    let general = Section {
        title: None,
        fields: vec![
            field("id", Cell::text(&s.id)),
            field("description", Cell::opt(s.description.as_deref())),
            field("status", Cell::text(s.status)),
            field("price", Cell::text(s.price)),
            field("customer", subscription_customer(state, token)?),
            field("plan", Cell::link(Entity::Plans, &s.plan_id, &s.plan_id)),
            field(
                "payment_method",
                token.map_or_else(Cell::empty, |token| {
                    Cell::link(Entity::CreditCards, token, token)
                }),
            ),
            field("merchant_account_id", Cell::text(&s.merchant_account_id)),
            field("balance", Cell::text(s.balance)),
            field("never_expires", Cell::flag(s.never_expires)),
            field("created_at", Cell::text(s.created_at)),
            field("updated_at", Cell::text(s.updated_at)),
        ],
    };
    let billing = Section {
        title: Some("Billing"),
        fields: vec![
            field("billing_day_of_month", Cell::opt(s.billing_day_of_month)),
            field("current_billing_cycle", Cell::text(s.current_billing_cycle)),
            field(
                "billing_period_end_date",
                Cell::opt(s.billing_period_end_date),
            ),
            field(
                "billing_period_start_date",
                Cell::opt(s.billing_period_start_date),
            ),
            field("days_past_due", Cell::opt(s.days_past_due)),
            field("failure_count", Cell::text(s.failure_count)),
            field("first_billing_date", Cell::text(s.first_billing_date)),
            field("next_billing_date", Cell::text(s.next_billing_date)),
            field(
                "number_of_billing_cycles",
                Cell::opt(s.number_of_billing_cycles),
            ),
            field("paid_through_date", Cell::opt(s.paid_through_date)),
        ],
    };
    let trial = Section {
        title: Some("Trial"),
        fields: vec![
            field("trial_duration", Cell::opt(s.trial_duration)),
            field("trial_duration_unit", Cell::opt(s.trial_duration_unit)),
            field("trial_period", Cell::flag(s.trial_period)),
        ],
    };

    Ok((
        s.id.clone(),
        vec![general, billing, trial],
        vec![
            modifier_inline("Add-ons", Entity::AddOns, &add_ons),
            modifier_inline("Discounts", Entity::Discounts, &discounts),
            history_inline(&history),
        ],
    ))
}
