use crate::models::order::OrderExportRow;

/// Render order history rows as CSV for download
pub fn render_orders_csv(rows: &[OrderExportRow]) -> String {
    let mut out = String::from("order_id,order_date,restaurant,status,total_amount\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{:.2}\n",
            row.id,
            row.order_date.format("%Y-%m-%d %H:%M:%S"),
            csv_field(&row.restaurant_name),
            row.status.as_str(),
            row.total_amount,
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
