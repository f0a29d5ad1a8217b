use crate::address::AddressParser;
use crate::model::{set_once, AlcoholType, Record, Status};
use crate::parser::chunks::iso_date;

use super::ListingEntry;

/// Converts listing entries into the common record shape. Entity numbers are
/// 1-based positions in the listing.
pub fn into_records(entries: &[ListingEntry], doc_id: &str, parser: &dyn AddressParser) -> Vec<Record> {
    let minutes_date = iso_date(doc_id).map(|d| d.format("%Y-%m-%d").to_string());

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut record = Record {
                minutes_date: minutes_date.clone(),
                entity_number: Some((i + 1).to_string()),
                file_name: Some(doc_id.to_string()),
                ..Record::default()
            };
            set_once(&mut record.business_name, &entry.business_name);
            if let Some(dba) = &entry.dba {
                set_once(&mut record.dba_name, dba);
            }

            let address = [&entry.address_line1, &entry.address_line2]
                .into_iter()
                .flatten()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            set_once(&mut record.address, &address);
            if let Some(address) = record.address.as_deref() {
                let parts = parser.parse(address);
                record.street_number = parts.street_number;
                record.street_name = parts.full_street_name;
                record.city = parts.neighborhood;
                record.state = parts.state;
                record.zipcode = parts.zipcode;
            }
            if record.zipcode.is_none() && entry.group.len() == 5 && entry.group.chars().all(|c| c.is_ascii_digit()) {
                record.zipcode = Some(entry.group.clone());
            }

            if let Some(license_type) = &entry.license_type {
                record.alcohol_type = AlcoholType::classify(license_type);
                set_once(&mut record.details, license_type);
            }

            let narrative = entry.status_lines.join(" ");
            set_once(&mut record.status_detail, &narrative);
            record.status = record.status_detail.as_deref().and_then(Status::from_detail);
            record
        })
        .collect()
}
