//! Páginas HTML de la UI
//!
//! Todo texto que venga del almacenamiento o del usuario pasa por
//! `html_escape` antes de entrar en el documento.

use std::fmt::Write;

use axum::response::Html;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::dto::dashboard_dto::DashboardStats;
use crate::middleware::auth::Principal;
use crate::models::customer::Customer;
use crate::models::invoice::{Invoice, PAYMENT_PAID, PAYMENT_PENDING};
use crate::models::mechanic::Mechanic;
use crate::models::service_request::{ServiceRequest, ServiceStatus};
use crate::models::user::Role;
use crate::models::vehicle::Vehicle;
use crate::utils::validation::SERVICE_DATE_FORMAT;

/// Estructura común: navegación, flash y contenido
pub fn layout(title: &str, principal: Option<Principal>, flash: Option<&str>, body: &str) -> Html<String> {
    let mut nav = String::new();
    if let Some(principal) = principal {
        nav.push_str(r#"<a href="/">Dashboard</a> "#);
        if principal.role == Role::Admin {
            nav.push_str(r#"<a href="/customers">Customers</a> "#);
        }
        nav.push_str(r#"<a href="/vehicles">Vehicles</a> <a href="/services">Services</a> "#);
        if principal.role == Role::Admin {
            nav.push_str(r#"<a href="/mechanics">Mechanics</a> <a href="/invoices">Invoices</a> "#);
        }
        nav.push_str(r#"<a href="/logout">Logout</a>"#);
    } else {
        nav.push_str(r#"<a href="/login">Login</a> <a href="/register">Register</a>"#);
    }

    let flash = flash
        .map(|message| format!(r#"<div class="flash">{}</div>"#, text(message)))
        .unwrap_or_default();

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title} | Garage Manager</title></head>\n\
         <body>\n<nav>{nav}</nav>\n{flash}\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = text(title),
    ))
}

fn option_list<'a>(items: impl Iterator<Item = (i64, String)>, selected: Option<i64>, empty: Option<&'a str>) -> String {
    let mut out = String::new();
    if let Some(label) = empty {
        let _ = write!(out, r#"<option value="">{}</option>"#, text(label));
    }
    for (id, label) in items {
        let mark = if selected == Some(id) { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{id}"{mark}>{}</option>"#, text(&label));
    }
    out
}

fn delete_button(action: &str) -> String {
    format!(
        r#"<form method="post" action="{}" style="display:inline"><button type="submit">Delete</button></form>"#,
        attr(action)
    )
}

pub fn login_page() -> String {
    r#"<form method="post" action="/login">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Login</button>
</form>"#
        .to_string()
}

pub fn register_page() -> String {
    r#"<form method="post" action="/register">
<label>Username <input name="username" required></label>
<label>Email <input name="email" type="email" required></label>
<label>Password <input name="password" type="password" required></label>
<label>Role <select name="role"><option value="admin">admin</option><option value="staff">staff</option></select></label>
<button type="submit">Register</button>
</form>"#
        .to_string()
}

pub fn dashboard_page(stats: &DashboardStats) -> String {
    let rows = [
        ("Customers", stats.total_customers),
        ("Vehicles", stats.total_vehicles),
        ("Mechanics", stats.total_mechanics),
        ("Available mechanics", stats.available_mechanics),
        ("Pending services", stats.pending_services),
        ("Completed services", stats.completed_services),
        ("Invoices", stats.total_invoices),
        ("Paid invoices", stats.paid_invoices),
        ("Pending invoices", stats.pending_invoices),
    ];
    let mut out = String::from("<table>");
    for (label, value) in rows {
        let _ = write!(out, "<tr><th>{label}</th><td>{value}</td></tr>");
    }
    out.push_str("</table>");
    out
}

// ---------- Customers ----------

pub fn customers_page(customers: &[Customer]) -> String {
    let mut out = String::from(
        r#"<a href="/customers/create">New customer</a>
<table><tr><th>ID</th><th>Name</th><th>Phone</th><th>Email</th><th>Address</th><th></th></tr>"#,
    );
    for c in customers {
        let _ = write!(
            out,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href="/customers/{}/update">Edit</a> {}</td></tr>"#,
            c.id,
            text(&c.name),
            text(&c.phone),
            text(c.email.as_deref().unwrap_or("")),
            text(c.address.as_deref().unwrap_or("")),
            c.id,
            delete_button(&format!("/customers/{}/delete", c.id)),
        );
    }
    out.push_str("</table>");
    out
}

pub fn customer_form(action: &str, customer: Option<&Customer>) -> String {
    let value = |f: fn(&Customer) -> Option<&str>| customer.and_then(f).map(|v| attr(v).into_owned()).unwrap_or_default();
    format!(
        r#"<form method="post" action="{action}">
<label>Name <input name="name" value="{name}" required></label>
<label>Phone <input name="phone" value="{phone}" required></label>
<label>Email <input name="email" type="email" value="{email}"></label>
<label>Address <input name="address" value="{address}"></label>
<button type="submit">Save</button>
</form>"#,
        action = attr(action),
        name = value(|c| Some(c.name.as_str())),
        phone = value(|c| Some(c.phone.as_str())),
        email = value(|c| c.email.as_deref()),
        address = value(|c| c.address.as_deref()),
    )
}

// ---------- Vehicles ----------

pub fn vehicles_page(vehicles: &[Vehicle]) -> String {
    let mut out = String::from(
        r#"<a href="/vehicles/create">New vehicle</a>
<table><tr><th>ID</th><th>Number</th><th>Type</th><th>Brand</th><th>Model</th><th>Customer</th><th></th></tr>"#,
    );
    for v in vehicles {
        let _ = write!(
            out,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href="/vehicles/{}/update">Edit</a> {}</td></tr>"#,
            v.id,
            text(&v.vehicle_number),
            text(&v.vehicle_type),
            text(&v.brand),
            text(&v.model),
            v.customer_id,
            v.id,
            delete_button(&format!("/vehicles/{}/delete", v.id)),
        );
    }
    out.push_str("</table>");
    out
}

pub fn vehicle_form(action: &str, vehicle: Option<&Vehicle>, customers: &[Customer]) -> String {
    let customers = option_list(
        customers.iter().map(|c| (c.id, format!("{} ({})", c.name, c.phone))),
        vehicle.map(|v| v.customer_id),
        None,
    );
    let value = |f: fn(&Vehicle) -> &str| vehicle.map(|v| attr(f(v)).into_owned()).unwrap_or_default();
    format!(
        r#"<form method="post" action="{action}">
<label>Customer <select name="customer_id">{customers}</select></label>
<label>Number <input name="vehicle_number" value="{number}" required></label>
<label>Type <input name="vehicle_type" value="{vehicle_type}" required></label>
<label>Brand <input name="brand" value="{brand}" required></label>
<label>Model <input name="model" value="{model}" required></label>
<button type="submit">Save</button>
</form>"#,
        action = attr(action),
        number = value(|v| v.vehicle_number.as_str()),
        vehicle_type = value(|v| v.vehicle_type.as_str()),
        brand = value(|v| v.brand.as_str()),
        model = value(|v| v.model.as_str()),
    )
}

// ---------- Services ----------

pub fn services_page(services: &[ServiceRequest]) -> String {
    let mut out = String::from(
        r#"<a href="/services/create">New service request</a>
<table><tr><th>ID</th><th>Vehicle</th><th>Type</th><th>Date</th><th>Problem</th><th>Status</th><th>Mechanic</th><th></th></tr>"#,
    );
    for s in services {
        let mechanic = s.assigned_mechanic_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
        let _ = write!(
            out,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href="/services/{}/update">Update</a> {}</td></tr>"#,
            s.id,
            s.vehicle_id,
            text(&s.service_type),
            s.service_date.format(SERVICE_DATE_FORMAT),
            text(&s.problem_description),
            s.status,
            mechanic,
            s.id,
            delete_button(&format!("/services/{}/delete", s.id)),
        );
    }
    out.push_str("</table>");
    out
}

/// Alta: solo se ofrecen mecánicos libres
pub fn service_create_form(vehicles: &[Vehicle], available: &[Mechanic]) -> String {
    let vehicles = option_list(
        vehicles.iter().map(|v| (v.id, format!("{} {} {}", v.vehicle_number, v.brand, v.model))),
        None,
        None,
    );
    let mechanics = option_list(
        available.iter().map(|m| (m.id, m.name.clone())),
        None,
        Some("Unassigned"),
    );
    format!(
        r#"<form method="post" action="/services/create">
<label>Vehicle <select name="vehicle_id">{vehicles}</select></label>
<label>Service type <input name="service_type" required></label>
<label>Date <input name="service_date" type="date" required></label>
<label>Problem <textarea name="problem_description" required></textarea></label>
<label>Mechanic <select name="mechanic_id">{mechanics}</select></label>
<button type="submit">Create</button>
</form>"#
    )
}

pub fn service_update_form(service: &ServiceRequest, mechanics: &[Mechanic]) -> String {
    let mechanics = option_list(
        mechanics.iter().map(|m| {
            let state = if m.is_available { "available" } else { "busy" };
            (m.id, format!("{} ({})", m.name, state))
        }),
        service.assigned_mechanic_id,
        Some("Unassigned"),
    );
    let mut statuses = String::new();
    for status in ServiceStatus::ALL {
        let mark = if status == service.status { " selected" } else { "" };
        let _ = write!(statuses, r#"<option value="{status}"{mark}>{status}</option>"#);
    }
    format!(
        r#"<p>Service #{id}: {service_type} on {date}</p>
<form method="post" action="/services/{id}/update">
<label>Status <select name="status">{statuses}</select></label>
<label>Mechanic <select name="mechanic_id">{mechanics}</select></label>
<button type="submit">Update</button>
</form>"#,
        id = service.id,
        service_type = text(&service.service_type),
        date = service.service_date.format(SERVICE_DATE_FORMAT),
    )
}

// ---------- Mechanics ----------

pub fn mechanics_page(mechanics: &[Mechanic]) -> String {
    let mut out = String::from(
        r#"<a href="/mechanics/create">New mechanic</a>
<table><tr><th>ID</th><th>Name</th><th>Phone</th><th>Specialization</th><th>Available</th><th></th></tr>"#,
    );
    for m in mechanics {
        let _ = write!(
            out,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href="/mechanics/{}/update">Edit</a> {}</td></tr>"#,
            m.id,
            text(&m.name),
            text(&m.phone),
            text(m.specialization.as_deref().unwrap_or("")),
            if m.is_available { "Yes" } else { "No" },
            m.id,
            delete_button(&format!("/mechanics/{}/delete", m.id)),
        );
    }
    out.push_str("</table>");
    out
}

pub fn mechanic_form(action: &str, mechanic: Option<&Mechanic>) -> String {
    let checked = mechanic.map_or(true, |m| m.is_available);
    format!(
        r#"<form method="post" action="{action}">
<label>Name <input name="name" value="{name}" required></label>
<label>Phone <input name="phone" value="{phone}" required></label>
<label>Specialization <input name="specialization" value="{specialization}"></label>
<label><input type="checkbox" name="is_available" value="on"{checked}> Available</label>
<button type="submit">Save</button>
</form>"#,
        action = attr(action),
        name = mechanic.map(|m| attr(&m.name).into_owned()).unwrap_or_default(),
        phone = mechanic.map(|m| attr(&m.phone).into_owned()).unwrap_or_default(),
        specialization = mechanic
            .and_then(|m| m.specialization.as_deref())
            .map(|s| attr(s).into_owned())
            .unwrap_or_default(),
        checked = if checked { " checked" } else { "" },
    )
}

// ---------- Invoices ----------

pub fn invoices_page(invoices: &[Invoice]) -> String {
    let mut out = String::from(
        r#"<a href="/invoices/create">New invoice</a>
<table><tr><th>ID</th><th>Service</th><th>Customer</th><th>Vehicle</th><th>Total</th><th>Payment</th><th></th></tr>"#,
    );
    for i in invoices {
        let _ = write!(
            out,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href="/invoices/{}/update">Edit</a> {}</td></tr>"#,
            i.id,
            i.service_id,
            i.customer_id,
            i.vehicle_id,
            i.total_amount,
            text(&i.payment_status),
            i.id,
            delete_button(&format!("/invoices/{}/delete", i.id)),
        );
    }
    out.push_str("</table>");
    out
}

fn payment_options(selected: &str) -> String {
    [PAYMENT_PENDING, PAYMENT_PAID]
        .iter()
        .map(|status| {
            let mark = if *status == selected { " selected" } else { "" };
            format!(r#"<option value="{status}"{mark}>{status}</option>"#)
        })
        .collect()
}

/// Alta de factura: solo órdenes completadas
pub fn invoice_create_form(completed: &[ServiceRequest], customers: &[Customer], vehicles: &[Vehicle]) -> String {
    let services = option_list(
        completed.iter().map(|s| (s.id, format!("#{} {}", s.id, s.service_type))),
        None,
        None,
    );
    let customers = option_list(customers.iter().map(|c| (c.id, c.name.clone())), None, None);
    let vehicles = option_list(vehicles.iter().map(|v| (v.id, v.vehicle_number.clone())), None, None);
    format!(
        r#"<form method="post" action="/invoices/create">
<label>Service <select name="service_id">{services}</select></label>
<label>Customer <select name="customer_id">{customers}</select></label>
<label>Vehicle <select name="vehicle_id">{vehicles}</select></label>
<label>Total <input name="total_amount" required></label>
<label>Payment <select name="payment_status">{payments}</select></label>
<button type="submit">Create</button>
</form>"#,
        payments = payment_options(PAYMENT_PENDING),
    )
}

pub fn invoice_update_form(invoice: &Invoice) -> String {
    format!(
        r#"<p>Invoice #{id} for service #{service}: {amount}</p>
<form method="post" action="/invoices/{id}/update">
<label>Payment <select name="payment_status">{payments}</select></label>
<button type="submit">Save</button>
</form>"#,
        id = invoice.id,
        service = invoice.service_id,
        amount = invoice.total_amount,
        payments = payment_options(&invoice.payment_status),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_content_is_escaped() {
        let customer = Customer {
            id: 1,
            name: "<script>alert(1)</script>".into(),
            phone: "555".into(),
            email: None,
            address: Some("\"quoted\"".into()),
            created_at: Utc::now(),
        };
        let page = customers_page(std::slice::from_ref(&customer));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));

        let form = customer_form("/customers/1/update", Some(&customer));
        assert!(form.contains("&quot;quoted&quot;"));
    }

    #[test]
    fn test_layout_shows_flash_and_role_links() {
        let staff = Principal { user_id: 2, role: Role::Staff };
        let Html(page) = layout("Services", Some(staff), Some("Access denied"), "");
        assert!(page.contains("Access denied"));
        assert!(!page.contains("/invoices"));

        let admin = Principal { user_id: 1, role: Role::Admin };
        let Html(page) = layout("Services", Some(admin), None, "");
        assert!(page.contains("/invoices"));
    }
}
