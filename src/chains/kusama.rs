use super::EndpointOption;

static RELAY: EndpointOption = EndpointOption {
    info: "kusama",
    text: "Kusama",
    para_id: None,
    providers: &[
        ("Allnodes", "wss://kusama-rpc.publicnode.com"),
        ("Dwellir", "wss://kusama-rpc.dwellir.com"),
        ("IBP1", "wss://rpc.ibp.network/kusama"),
        ("IBP2", "wss://kusama.dotters.network"),
        ("LuckyFriday", "wss://rpc-kusama.luckyfriday.io"),
        ("OnFinality", "wss://kusama.api.onfinality.io/public-ws"),
        ("Stakeworld", "wss://ksm-rpc.stakeworld.io"),
    ],
};

// System parachains first, then community parachains by para id
const PARACHAINS: &[EndpointOption] = &[
    EndpointOption {
        info: "statemine",
        text: "AssetHub",
        para_id: Some(1000),
        providers: &[
            ("Dwellir", "wss://asset-hub-kusama-rpc.dwellir.com"),
            ("IBP1", "wss://sys.ibp.network/asset-hub-kusama"),
            ("IBP2", "wss://asset-hub-kusama.dotters.network"),
            ("LuckyFriday", "wss://rpc-asset-hub-kusama.luckyfriday.io"),
            ("Parity", "wss://kusama-asset-hub-rpc.polkadot.io"),
            ("Stakeworld", "wss://ksm-rpc.stakeworld.io/assethub"),
        ],
    },
    EndpointOption {
        info: "encointer",
        text: "Encointer Network",
        para_id: Some(1001),
        providers: &[
            ("Encointer Association", "wss://kusama.api.encointer.org"),
            ("IBP1", "wss://sys.ibp.network/encointer-kusama"),
            ("IBP2", "wss://encointer-kusama.dotters.network"),
        ],
    },
    EndpointOption {
        info: "kusamaBridgeHub",
        text: "BridgeHub",
        para_id: Some(1002),
        providers: &[
            ("Dwellir", "wss://bridge-hub-kusama-rpc.dwellir.com"),
            ("IBP1", "wss://sys.ibp.network/bridgehub-kusama"),
            ("IBP2", "wss://bridge-hub-kusama.dotters.network"),
            ("Parity", "wss://kusama-bridge-hub-rpc.polkadot.io"),
        ],
    },
    EndpointOption {
        info: "kusamaPeople",
        text: "People",
        para_id: Some(1004),
        providers: &[
            ("IBP1", "wss://sys.ibp.network/people-kusama"),
            ("IBP2", "wss://people-kusama.dotters.network"),
            ("LuckyFriday", "wss://rpc-people-kusama.luckyfriday.io"),
            ("Parity", "wss://kusama-people-rpc.polkadot.io"),
        ],
    },
    EndpointOption {
        info: "kusamaCoretime",
        text: "Coretime",
        para_id: Some(1005),
        providers: &[
            ("IBP1", "wss://sys.ibp.network/coretime-kusama"),
            ("IBP2", "wss://coretime-kusama.dotters.network"),
            ("LuckyFriday", "wss://rpc-coretime-kusama.luckyfriday.io"),
            ("Parity", "wss://kusama-coretime-rpc.polkadot.io"),
        ],
    },
    EndpointOption {
        info: "karura",
        text: "Karura",
        para_id: Some(2000),
        providers: &[
            ("Acala Foundation 0", "wss://karura-rpc-0.aca-api.network"),
            ("Acala Foundation 1", "wss://karura-rpc-1.aca-api.network"),
            ("Dwellir", "wss://karura-rpc.dwellir.com"),
        ],
    },
    EndpointOption {
        info: "bifrost",
        text: "Bifrost",
        para_id: Some(2001),
        providers: &[
            ("Liebi", "wss://bifrost-rpc.liebi.com/ws"),
            ("OnFinality", "wss://bifrost-parachain.api.onfinality.io/public-ws"),
        ],
    },
    EndpointOption {
        info: "shiden",
        text: "Shiden",
        para_id: Some(2007),
        providers: &[
            ("Astar", "wss://rpc.shiden.astar.network"),
            ("Dwellir", "wss://shiden-rpc.dwellir.com"),
            ("OnFinality", "wss://shiden.api.onfinality.io/public-ws"),
        ],
    },
    EndpointOption {
        info: "moonriver",
        text: "Moonriver",
        para_id: Some(2023),
        providers: &[
            ("Allnodes", "wss://moonriver-rpc.publicnode.com"),
            ("Moonbeam Foundation", "wss://wss.api.moonriver.moonbeam.network"),
            ("OnFinality", "wss://moonriver.api.onfinality.io/public-ws"),
        ],
    },
    EndpointOption {
        info: "robonomics",
        text: "Robonomics",
        para_id: Some(2048),
        providers: &[("Airalab", "wss://kusama.rpc.robonomics.network/")],
    },
    EndpointOption {
        info: "calamari",
        text: "Calamari",
        para_id: Some(2084),
        providers: &[("Manta Network", "wss://calamari.systems")],
    },
    EndpointOption {
        info: "altair",
        text: "Altair",
        para_id: Some(2088),
        providers: &[("Centrifuge", "wss://fullnode.altair.centrifuge.io")],
    },
    EndpointOption {
        info: "basilisk",
        text: "Basilisk",
        para_id: Some(2090),
        providers: &[
            ("Basilisk", "wss://rpc.basilisk.cloud"),
            ("Dwellir", "wss://basilisk-rpc.dwellir.com"),
        ],
    },
    EndpointOption {
        info: "kintsugi",
        text: "Kintsugi BTC",
        para_id: Some(2092),
        providers: &[
            ("Kintsugi Labs", "wss://api-kusama.interlay.io/parachain"),
            ("OnFinality", "wss://kintsugi.api.onfinality.io/public-ws"),
        ],
    },
];

/// The Kusama relay chain
pub fn kusama_relay() -> &'static EndpointOption {
    &RELAY
}

/// Kusama parachains with public endpoints
pub fn kusama_parachains() -> &'static [EndpointOption] {
    PARACHAINS
}
