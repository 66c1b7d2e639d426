// Device payloads and the rendered dashboard state

mod gateway;
mod status;
mod view;

pub use gateway::{
    DeviceReply, FlowCounterSet, FlowCounterSnapshot, FlowReading, GatewayConfig, MAX_FLOW_COUNTERS,
    MAX_PORT_NAME_LEN, PortSettings, Rs485Settings, validate_ports,
};
pub use status::{
    EthernetStatus, SerialBusStatus, StatusSnapshot, StorageStatus, TcpGatewayStatus,
};
pub use view::{
    Badge, BadgeTone, CounterStatus, EthernetView, FlowCounterPanel, FlowCounterView,
    FlowReadingView, RenderedState, SerialBusView, StorageView, TcpGatewayView, UptimeView,
};
