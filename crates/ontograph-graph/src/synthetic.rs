//! Deterministic sample network of a container-shipping business.
//!
//! Every one of the fifteen entity types appears, and every relation
//! except the booking timeline is inserted together with its inverse.
//! No randomness: the same call always yields the same graph, in the
//! same order.

use crate::builder::GraphBuilder;
use crate::edge::relation::*;
use crate::graph::OntologyGraph;
use ontograph_core::{ConstructionError, EntityType, Node};

const SHIPPERS: &[(&str, &str, &str, &str)] = &[
    // id, label, industry, tier
    ("SHP-001", "Samsung Electronics", "Electronics", "VIP"),
    ("SHP-002", "Hyundai Motor", "Automotive", "VIP"),
    ("SHP-003", "LG Chem", "Chemicals", "Gold"),
    ("SHP-004", "CJ CheilJedang", "Food", "Silver"),
];

const ROUTES: &[(&str, &str, &str)] = &[
    // id, label, transit days
    ("RT-USWC", "Korea - US West Coast", "14"),
    ("RT-EU", "Korea - North Europe", "32"),
    ("RT-SEA", "Korea - Southeast Asia", "7"),
];

const PORTS: &[(&str, &str, &str)] = &[
    ("PRT-BUS", "Busan", "KR"),
    ("PRT-LAX", "Los Angeles", "US"),
    ("PRT-RTM", "Rotterdam", "NL"),
    ("PRT-SIN", "Singapore", "SG"),
];

const VESSELS: &[(&str, &str, &str)] = &[
    // id, label, TEU capacity
    ("VSL-001", "KMTC Seoul", "6500"),
    ("VSL-002", "KMTC Busan", "6500"),
    ("VSL-003", "Hana Pioneer", "13000"),
    ("VSL-004", "Sinar Bintan", "2800"),
];

const SHIP_OWNERS: &[(&str, &str)] = &[("SO-001", "Korea Marine Holdings"), ("SO-002", "Pan Ocean Leasing")];

const TERMINALS: &[(&str, &str, usize)] = &[
    // id, label, port
    ("TML-001", "Busan New Port PNIT", 0),
    ("TML-002", "Busan North Port HBCT", 0),
    ("TML-003", "Pier 400", 1),
];

const CUSTOMS: &[(&str, &str)] = &[("CUS-KR", "Korea Customs Service"), ("CUS-INT", "Foreign Customs Brokerage")];

const COMPETITORS: &[(&str, &str)] = &[("CMP-001", "HMM"), ("CMP-002", "Evergreen")];

const MARKET_INDICES: &[(&str, &str)] = &[("IDX-SCFI", "SCFI"), ("IDX-KCCI", "KCCI")];

const CARGO: &[(&str, &str, &str)] = &[
    ("CG-001", "Semiconductors", "Electronics"),
    ("CG-002", "Auto Parts", "Automotive"),
    ("CG-003", "Petrochemicals", "Chemicals"),
];

const INSURERS: &[(&str, &str)] = &[("INS-001", "Samsung Fire Marine"), ("INS-002", "DB Insurance")];

const FORWARDERS: &[(&str, &str)] = &[("FF-001", "Pantos Logistics"), ("FF-002", "Sebang Global")];

const BOOKINGS: usize = 8;
const SALES_ACTIVITIES: usize = 5;

/// Shippers that hold a service contract; the last shipper books spot.
const CONTRACTED_SHIPPERS: usize = 3;

/// Builds the sample network.
pub fn shipping_ontology() -> Result<OntologyGraph, ConstructionError> {
    let mut builder = GraphBuilder::new();

    for (i, (id, label, industry, tier)) in SHIPPERS.iter().enumerate() {
        builder.add_node(
            Node::new(*id, EntityType::Shipper, *label)
                .with_weight(60.0 - 10.0 * i as f64)
                .with_property("industry", *industry)
                .with_property("tier", *tier),
        );
    }
    for (id, label) in FORWARDERS {
        builder.add_node(Node::new(*id, EntityType::FreightForwarder, *label));
    }
    for i in 0..SALES_ACTIVITIES {
        let kind = ["Visit", "Call", "Email"][i % 3];
        builder.add_node(
            Node::new(sales_id(i), EntityType::SalesActivity, format!("{} #{}", kind, i + 1))
                .with_weight(4.0)
                .with_property("kind", kind),
        );
    }
    for i in 0..CONTRACTED_SHIPPERS {
        builder.add_node(
            Node::new(contract_id(i), EntityType::Contract, format!("SC-2024-{:03}", i + 1))
                .with_weight(20.0)
                .with_property("term", "12 months"),
        );
    }
    for i in 0..BOOKINGS {
        builder.add_node(
            Node::new(booking_id(i), EntityType::Booking, format!("BKG-{:04}", 1001 + i))
                .with_weight(6.0)
                .with_property("teu", ((i % 4) + 1).to_string())
                .with_property("week", format!("W{:02}", 10 + i)),
        );
    }
    for (id, label, category) in CARGO {
        builder.add_node(Node::new(*id, EntityType::Cargo, *label).with_property("category", *category));
    }
    for (id, label) in INSURERS {
        builder.add_node(Node::new(*id, EntityType::Insurance, *label));
    }
    for (id, label, transit) in ROUTES {
        builder.add_node(
            Node::new(*id, EntityType::Route, *label)
                .with_weight(50.0)
                .with_property("transit_time", *transit),
        );
    }
    for (id, label, teu) in VESSELS {
        builder.add_node(
            Node::new(*id, EntityType::Vessel, *label)
                .with_weight(30.0)
                .with_property("capacity_teu", *teu),
        );
    }
    for (id, label) in SHIP_OWNERS {
        builder.add_node(Node::new(*id, EntityType::ShipOwner, *label));
    }
    for (id, label, country) in PORTS {
        builder.add_node(
            Node::new(*id, EntityType::Port, *label)
                .with_weight(25.0)
                .with_property("country", *country),
        );
    }
    for (id, label, _) in TERMINALS {
        builder.add_node(Node::new(*id, EntityType::Terminal, *label));
    }
    for (id, label) in CUSTOMS {
        builder.add_node(Node::new(*id, EntityType::Customs, *label));
    }
    for (id, label) in COMPETITORS {
        builder.add_node(Node::new(*id, EntityType::Competitor, *label).with_weight(20.0));
    }
    for (id, label) in MARKET_INDICES {
        builder.add_node(Node::new(*id, EntityType::MarketIndex, *label).with_weight(15.0));
    }

    link(&mut builder);
    builder.build()
}

fn sales_id(i: usize) -> String {
    format!("SA-{:03}", i + 1)
}

fn contract_id(i: usize) -> String {
    format!("CT-{:03}", i + 1)
}

fn booking_id(i: usize) -> String {
    format!("BK-{:03}", i + 1)
}

fn link(builder: &mut GraphBuilder) {
    let shipper = |i: usize| SHIPPERS[i % SHIPPERS.len()].0;
    let route = |i: usize| ROUTES[i % ROUTES.len()].0;
    let port = |i: usize| PORTS[i % PORTS.len()].0;

    for i in 0..CONTRACTED_SHIPPERS {
        builder.add_relation_pair(shipper(i), &contract_id(i), HAS_CONTRACT, CONTRACT_OF);
    }

    for i in 0..SHIPPERS.len() {
        builder.add_relation_pair(shipper(i), route(i), USES, USED_BY);
        builder.add_relation_pair(shipper(i), route(i + 1), USES, USED_BY);
    }

    for i in 0..SALES_ACTIVITIES {
        builder.add_relation_pair(shipper(i), &sales_id(i), HAS_ACTIVITY, ACTIVITY_OF);
    }

    for i in 0..BOOKINGS {
        let booking = booking_id(i);
        let owner = i % SHIPPERS.len();
        builder.add_relation_pair(shipper(owner), &booking, MAKES_BOOKING, BOOKED_BY);
        if owner < CONTRACTED_SHIPPERS {
            builder.add_relation_pair(&booking, &contract_id(owner), APPLIES_CONTRACT, APPLIED_TO);
        }
        builder.add_relation_pair(&booking, route(owner + i / SHIPPERS.len()), ON_ROUTE, ROUTE_OF);
        builder.add_relation_pair(&booking, CARGO[i % CARGO.len()].0, CARRIES, CARRIED_IN);
        if i % 2 == 1 {
            builder.add_relation_pair(&booking, FORWARDERS[(i / 2) % FORWARDERS.len()].0, ARRANGED_BY, ARRANGES);
        }
        // the booking timeline runs one way only
        if i + 1 < BOOKINGS {
            builder.add_edge(booking.clone(), booking_id(i + 1), TIME_NEXT);
        }
    }

    for (i, (cargo, _, _)) in CARGO.iter().enumerate() {
        builder.add_relation_pair(cargo, INSURERS[i % INSURERS.len()].0, INSURED_BY, INSURES);
    }

    for (i, (vessel, _, _)) in VESSELS.iter().enumerate() {
        builder.add_relation_pair(vessel, route(i), OPERATES_ON, SERVED_BY);
        builder.add_relation_pair(vessel, SHIP_OWNERS[i % SHIP_OWNERS.len()].0, OWNED_BY, OWNS);
    }

    // every route leaves from the hub port
    for (i, (id, _, _)) in ROUTES.iter().enumerate() {
        builder.add_relation_pair(id, port(0), CALLS_AT, CALLED_BY);
        builder.add_relation_pair(id, port(i + 1), CALLS_AT, CALLED_BY);
        builder.add_relation_pair(id, MARKET_INDICES[i % MARKET_INDICES.len()].0, HAS_INDEX, INDEXES);
    }

    for (terminal, _, at) in TERMINALS {
        builder.add_relation_pair(port(*at), terminal, HAS_TERMINAL, LOCATED_IN);
    }

    for i in 0..PORTS.len() {
        let customs = if i == 0 { CUSTOMS[0].0 } else { CUSTOMS[1].0 };
        builder.add_relation_pair(port(i), customs, CLEARED_BY, CLEARS);
    }

    for (i, (competitor, _)) in COMPETITORS.iter().enumerate() {
        builder.add_relation_pair(competitor, route(i), COMPETES_WITH, COMPETED_BY);
        builder.add_relation_pair(competitor, route(i + 1), COMPETES_WITH, COMPETED_BY);
        builder.add_relation_pair(competitor, MARKET_INDICES[i].0, AFFECTED_BY, AFFECTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_every_entity_type() {
        let graph = shipping_ontology().unwrap();
        for entity_type in EntityType::ALL {
            assert!(
                !graph.find_by_type(entity_type).is_empty(),
                "missing {}",
                entity_type
            );
        }
    }

    #[test]
    fn test_is_deterministic() {
        let first = shipping_ontology().unwrap();
        let second = shipping_ontology().unwrap();
        assert_eq!(first.export_edges(), second.export_edges());
        let a: Vec<_> = first.nodes().cloned().collect();
        let b: Vec<_> = second.nodes().cloned().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_relations_come_in_pairs() {
        let graph = shipping_ontology().unwrap();
        let edges = graph.export_edges();
        for edge in edges.iter().filter(|e| e.relationship != TIME_NEXT) {
            let inverse = inverse_of(&edge.relationship).unwrap();
            assert!(
                edges.iter().any(|e| e.source == edge.target
                    && e.target == edge.source
                    && e.relationship == inverse),
                "{} -[{}]-> {} has no inverse",
                edge.source,
                edge.relationship,
                edge.target
            );
        }
    }

    #[test]
    fn test_single_component() {
        let graph = shipping_ontology().unwrap();
        let first = graph.nodes().next().unwrap().id.clone();
        for node in graph.nodes() {
            let outcome = graph.shortest_path(&first, &node.id).unwrap();
            assert!(outcome.is_found(), "{} unreachable", node.id);
        }
    }
}
