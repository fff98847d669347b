#[cfg(test)]
mod grid_scenario_tests {
    use std::collections::HashSet;
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    use quaggasim::config::{Config, GridConfig, OspfMode, OspfSettings, ProtocolsConfig};
    use quaggasim::config_loader::load_config;
    use quaggasim::ip::{AddressPlan, AddressScheme};
    use quaggasim::orchestrator::{build_scenario, generate_scenario, ADDRESS_PLAN_FILE, LAUNCH_PLAN_FILE};
    use quaggasim::quagga::install::config_path;
    use quaggasim::quagga::render::{render, render_bgp, render_ospf};
    use quaggasim::quagga::{helper, stores_for, BgpConfig, OspfConfig, ProtocolKind, ZebraConfig};
    use quaggasim::topology::{area_id, build_grid, AreaTiling, EdgeClass, NodeId};
    use quaggasim::utils::verify_edge_counts;

    fn stripeless_tiling() -> AreaTiling {
        AreaTiling {
            area_height: 2,
            area_width: 2,
            stripe_width: 0,
            area_rows: 2,
            area_cols: 2,
        }
    }

    /// A 4x4 grid fully covered by four 2x2 areas has no backbone at all
    #[test]
    fn test_stripeless_4x4_grid() {
        let tiling = stripeless_tiling();
        let topology = build_grid(4, 4, &tiling).unwrap();

        assert_eq!(topology.area_count(), 4);
        for node in topology.nodes() {
            assert_ne!(topology.area_of(*node), 0, "node {} should be inside an area", node);
        }

        let counts = topology.counts();
        assert_eq!(counts.intra, 32);
        assert_eq!(counts.inter, 0);
        assert_eq!(counts.border, 0);
        assert!(verify_edge_counts(&topology).is_ok());
        println!("✓ 4x4 stripeless grid: {} intra links", counts.intra);
    }

    /// The default tiling on its 6x6 grid
    #[test]
    fn test_default_6x6_grid() {
        let tiling = AreaTiling::default();
        let topology = build_grid(6, 6, &tiling).unwrap();

        let counts = topology.counts();
        assert_eq!((counts.intra, counts.inter, counts.border), (16, 24, 32));
        assert_eq!(counts.total(), 2 * 6 * 6);
        assert!(verify_edge_counts(&topology).is_ok());

        // Border links always list the in-area node first
        for edge in topology.border_edges() {
            assert_ne!(topology.area_of(edge.a), 0);
            assert_eq!(topology.area_of(edge.b), 0);
        }
        for edge in topology.inter_edges() {
            assert_eq!(topology.area_of(edge.a), 0);
            assert_eq!(topology.area_of(edge.b), 0);
        }
        println!("✓ 6x6 grid: 16 intra / 24 inter / 32 border");
    }

    /// Area ids depend on position only
    #[test]
    fn test_area_id_is_positional() {
        let tiling = AreaTiling::default();
        for row in 0..6 {
            for col in 0..6 {
                assert_eq!(area_id(&tiling, row, col), area_id(&tiling, row, col));
            }
        }

        let single = AreaTiling::single_area(5, 7);
        for row in 0..5 {
            for col in 0..7 {
                assert_eq!(area_id(&single, row, col), 1);
            }
        }
    }

    /// Rebuilding the same scenario gives the same links and addresses
    #[test]
    fn test_topology_and_addresses_are_reproducible() {
        let tiling = AreaTiling::default();
        let first = build_grid(6, 6, &tiling).unwrap();
        let second = build_grid(6, 6, &tiling).unwrap();

        for class in EdgeClass::ALL {
            assert_eq!(first.edges(class), second.edges(class));
        }

        let plan_a = AddressPlan::build(&first, AddressScheme::Hierarchical).unwrap();
        let plan_b = AddressPlan::build(&second, AddressScheme::Hierarchical).unwrap();
        assert_eq!(plan_a.links(), plan_b.links());
    }

    /// Flat addresses are unique across the whole grid
    #[test]
    fn test_flat_addresses_are_unique() {
        let tiling = AreaTiling {
            area_height: 3,
            area_width: 3,
            stripe_width: 1,
            area_rows: 3,
            area_cols: 3,
        };
        let topology = build_grid(12, 12, &tiling).unwrap();
        assert!(verify_edge_counts(&topology).is_ok());

        let plan = AddressPlan::build(&topology, AddressScheme::Flat).unwrap();
        let mut seen = HashSet::new();
        for link in plan.links() {
            assert!(seen.insert(link.first.address.addr()));
            assert!(seen.insert(link.second.address.addr()));
        }
        assert_eq!(seen.len(), 2 * 2 * 12 * 12);
    }

    /// BGP on node 4 with one peer-link neighbor and one network
    #[test]
    fn test_bgp_render_with_peer_link() {
        let mut stores = stores_for(&[NodeId(4)]);
        helper::enable_bgp(&mut stores);
        helper::bgp_add_neighbor(&mut stores[0], "10.0.0.2", 2);
        helper::bgp_add_peer_link(&mut stores[0], "10.0.0.2");
        helper::bgp_add_network(&mut stores[0], "10.0.0.0/24");

        assert_eq!(helper::get_asn(&stores[0]), Some(5));
        let lines = render_bgp(stores[0].record::<BgpConfig>().unwrap());

        for expected in [
            "router bgp 5",
            "  bgp router-id 192.168.0.5",
            "  neighbor 10.0.0.2 remote-as 2",
            "  neighbor 10.0.0.2 advertisement-interval 5",
            "  address-family ipv4 unicast",
            "   neighbor 10.0.0.2 route-map MAP-192.168.0.5-10.0.0.2 out",
            "access-list ALIST-192.168.0.5 permit 10.0.0.0/24",
            "route-map MAP-192.168.0.5-10.0.0.2 permit 5",
            " match ip address ALIST-192.168.0.5",
        ] {
            assert!(lines.iter().any(|line| line == expected), "missing line {:?}", expected);
        }
    }

    /// The network map and the area range are independent fields
    #[test]
    fn test_ospf_network_and_area_range() {
        let network = "10.0.0.0/16".parse().unwrap();
        let mut stores = stores_for(&[NodeId(0)]);
        helper::enable_ospf_area(&mut stores, network, 0);
        helper::set_area(&mut stores, network, 3);

        let lines = render_ospf(stores[0].record::<OspfConfig>().unwrap());
        let router = lines.iter().position(|l| l == "router ospf").unwrap();
        assert_eq!(lines[router + 1], "  network 10.0.0.0/16 area 0");
        assert_eq!(lines[router + 2], "  area 3 range 10.0.0.0/16");
        assert_eq!(lines[router + 3], " redistribute connected");
    }

    /// Rendering the same record twice gives identical text
    #[test]
    fn test_rendering_is_deterministic() {
        let config = Config {
            grid: GridConfig {
                areas: Some(AreaTiling::default()),
                ..Default::default()
            },
            protocols: ProtocolsConfig {
                ospf: Some(OspfSettings {
                    interfaces: true,
                    debug: true,
                    ..Default::default()
                }),
                bgp: Some(Default::default()),
                ..Default::default()
            },
            ..Default::default()
        };

        let first = build_scenario(&config).unwrap();
        let second = build_scenario(&config).unwrap();
        for (a, b) in first.stores.iter().zip(second.stores.iter()) {
            for kind in a.kinds() {
                let left = render(a.get(kind).unwrap()).join("\n");
                let right = render(b.get(kind).unwrap()).join("\n");
                assert_eq!(left, right);
            }
        }
    }

    /// A full area scenario written to disk
    #[test]
    fn test_generate_area_scenario() {
        let dir = TempDir::new().unwrap();
        let yaml = r#"
general:
  stop_time: "5m"
grid:
  areas:
    area_height: 2
    area_width: 2
    stripe_width: 1
    area_rows: 2
    area_cols: 2
protocols:
  zebra:
    debug: true
  ospf:
    mode: area
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        let summary = generate_scenario(&config, dir.path()).unwrap();

        assert_eq!(summary.nodes, 36);
        assert_eq!(summary.areas, 4);
        assert_eq!(summary.daemons, 72);
        assert_eq!(summary.files_written, 72);

        // Node 0 is in area 1
        let ospfd = fs::read_to_string(config_path(dir.path(), NodeId(0), ProtocolKind::Ospf)).unwrap();
        assert!(ospfd.contains("  network 10.1.0.0/16 area 1\n"));
        assert!(ospfd.contains("  area 1 range 10.1.0.0/16\n"));
        assert!(ospfd.ends_with("!\n"));

        // Node 2 sits on the backbone stripe
        let ospfd = fs::read_to_string(config_path(dir.path(), NodeId(2), ProtocolKind::Ospf)).unwrap();
        assert!(ospfd.contains("  area 0 range 10.0.0.0/16\n"));

        let zebra = fs::read_to_string(config_path(dir.path(), NodeId(35), ProtocolKind::Zebra)).unwrap();
        assert!(zebra.contains("debug zebra kernel\n"));

        let plan: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(ADDRESS_PLAN_FILE)).unwrap()).unwrap();
        assert_eq!(plan["scheme"], "hierarchical");
        assert_eq!(plan["links"].as_array().unwrap().len(), 72);

        let launch: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(LAUNCH_PLAN_FILE)).unwrap()).unwrap();
        assert_eq!(launch["stop_time"], "5m");
        let daemons = launch["daemons"].as_array().unwrap();
        assert_eq!(daemons[0]["binary"], "zebra");
        assert_eq!(daemons[0]["start_time"], "1s");
        assert_eq!(daemons[1]["binary"], "ospfd");
        assert_eq!(daemons[1]["args"][1], "/usr/local/etc/ospfd.conf");
        println!("✓ Area scenario generated with {} daemons", daemons.len());
    }

    /// A 128-node ring running flat OSPF over one /8
    #[test]
    fn test_ring_with_flat_ospf() {
        let config = Config {
            grid: GridConfig {
                rows: Some(128),
                cols: Some(1),
                areas: None,
            },
            addressing: AddressScheme::Flat,
            protocols: ProtocolsConfig {
                ospf: Some(OspfSettings {
                    mode: OspfMode::Flat,
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let scenario = build_scenario(&config).unwrap();
        assert_eq!(scenario.topology.counts().intra, 256);
        assert_eq!(scenario.plan.links()[0].first.address.to_string(), "10.0.0.1/30");

        for store in &scenario.stores {
            let lines = render_ospf(store.record::<OspfConfig>().unwrap());
            assert!(lines.contains(&"  network 10.0.0.0/8 area 0".to_string()));
            assert!(!lines.iter().any(|l| l.contains("range")));
        }
    }

    /// Manual zebra configuration is launched but never written
    #[test]
    fn test_manual_zebra_scenario() {
        let dir = TempDir::new().unwrap();
        let mut config = Config {
            grid: GridConfig {
                rows: Some(2),
                cols: Some(2),
                areas: None,
            },
            ..Default::default()
        };
        config.protocols.zebra.manual_config = true;

        let summary = generate_scenario(&config, dir.path()).unwrap();
        assert_eq!(summary.daemons, 4);
        assert_eq!(summary.files_written, 0);
        assert!(!config_path(dir.path(), NodeId(0), ProtocolKind::Zebra).exists());

        let scenario = build_scenario(&config).unwrap();
        assert!(scenario.stores[0].record::<ZebraConfig>().unwrap().manual_config());
    }
}
