// HTML body for the emailed resource report: the cluster aggregates table
// plus the current banner alerts. Relayed as-is through the backend mailer.

use crate::analysis::alerts::ResourceAlert;
use crate::models::ClusterAggregate;

pub fn render_email_report(
    aggregates: &[ClusterAggregate],
    alerts: &[ResourceAlert],
) -> String {
    let mut rows = String::new();
    for agg in aggregates {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td><td>{:.2}%</td>\
             <td>{:.2}%</td><td>{:.2}%</td><td>{:.2}%</td><td>{:.2}%</td></tr>",
            agg.group_name,
            agg.cluster_name,
            agg.count,
            agg.memory,
            agg.max_memory,
            agg.disk,
            agg.max_disk,
            agg.cpu,
            agg.max_cpu,
        ));
    }

    let mut alert_items = String::new();
    for alert in alerts {
        alert_items.push_str(&format!("<li>{}</li>", alert.message));
    }
    let alert_block = if alert_items.is_empty() {
        "<p>No metrics outside the configured thresholds.</p>".to_string()
    } else {
        format!("<ul>{}</ul>", alert_items)
    };

    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif;">
    <h1 style="color: #333;">Server resource usage report</h1>
    <h2>Cluster usage</h2>
    <table border="1" cellspacing="0" cellpadding="4">
      <tr><th>Group</th><th>Cluster</th><th>Instances</th><th>Mem avg</th><th>Mem max</th>
      <th>Disk avg</th><th>Disk max</th><th>CPU avg</th><th>CPU max</th></tr>
      {}
    </table>
    <h2>Alerts</h2>
    {}
  </body>
</html>"#,
        rows, alert_block
    )
}
