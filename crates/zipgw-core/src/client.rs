//! The caller-facing client: a thin tokio driver around the pure machines.
//!
//! `ZipClient` spawns one task that owns the coordinator and the transport.
//! Requests arrive over an mpsc channel, each carrying a oneshot for its
//! result; unsolicited traffic and late results of queued commands fan out
//! over a broadcast channel. Only this task writes to the socket, which
//! gives outbound frames their per-command ordering for free.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use zipgw_proto::command::inclusion::{
    NodeAdd, NodeAddDskSet, NodeAddKeysSet, NodeAddMode, NodeRemove, NodeRemoveMode,
};
use zipgw_proto::command::management::{DefaultSet, LearnMode, LearnModeSet};
use zipgw_proto::command::proxy::{NodeInfoCacheReport, NodeInfoCachedGet, NodeListGet};
use zipgw_proto::command::RawCommand;
use zipgw_proto::envelope::PacketTypes;
use zipgw_proto::registry::{CommandClass, CommandId, S2KeyMask};
use zipgw_proto::{Datagram, KeepAlive, NodeId, Packet, ZWaveCommand};

use crate::config::ZipConfig;
use crate::coordinator::{CoordinatorAction, NetworkCoordinator, NetworkMode};
use crate::env::{Environment, SystemEnv};
use crate::error::{CommandError, CommandOutcome, CommandResult};
use crate::transport::{Transport, UdpTransport};

/// Deadline-check granularity of the driver loop.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Events published to subscribers.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A packet nobody was waiting for: gateway pushes, reports from
    /// unprompted nodes, inclusion key/DSK exchanges
    Unsolicited(Packet),
    /// A command that had gone to `Queued` finally resolved
    QueuedCommandResult {
        /// The command's sequence number, as returned at queue time
        seq_no: u8,
        /// Terminal result after mailbox delivery
        result: CommandResult,
    },
}

enum Request {
    Execute { request: ZWaveCommand, reply: oneshot::Sender<CommandResult> },
    Mode { reply: oneshot::Sender<NetworkMode> },
    ConfigurationDone,
    Shutdown,
}

/// Async handle to a running Z/IP client.
pub struct ZipClient {
    requests: mpsc::Sender<Request>,
    events: broadcast::Sender<ClientEvent>,
    driver: JoinHandle<()>,
}

impl ZipClient {
    /// Bind the UDP transport and start the driver.
    ///
    /// # Errors
    ///
    /// Returns the socket bind/connect failure.
    pub async fn connect(config: ZipConfig) -> std::io::Result<Self> {
        let transport = UdpTransport::connect(&config).await?;
        Ok(Self::with_transport(config, transport, SystemEnv))
    }

    /// Start the driver over an arbitrary transport and environment. This
    /// is the seam the deterministic harness uses.
    #[must_use]
    pub fn with_transport<T, E>(config: ZipConfig, transport: T, env: E) -> Self
    where
        T: Transport,
        E: Environment,
    {
        let (requests, request_rx) = mpsc::channel(32);
        let (events, _) = broadcast::channel(64);

        let mut coordinator = NetworkCoordinator::new(&config, env.random_u8());
        coordinator.startup_complete();

        let driver =
            tokio::spawn(drive(coordinator, transport, env, request_rx, events.clone()));

        Self { requests, events, driver }
    }

    /// Subscribe to unsolicited packets and late queued-command results.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Run one command through the coordinator and wait for its result.
    pub async fn execute(&self, request: ZWaveCommand) -> CommandResult {
        let (reply, result) = oneshot::channel();
        self.requests
            .send(Request::Execute { request, reply })
            .await
            .map_err(|_| CommandError::TransportClosed)?;
        result.await.unwrap_or(Err(CommandError::TransportClosed))
    }

    /// Current network mode.
    pub async fn mode(&self) -> Result<NetworkMode, CommandError> {
        let (reply, result) = oneshot::channel();
        self.requests
            .send(Request::Mode { reply })
            .await
            .map_err(|_| CommandError::TransportClosed)?;
        result.await.map_err(|_| CommandError::TransportClosed)
    }

    /// Start a Security-2 inclusion. Resolves with the final
    /// node-add status report; the key and DSK exchange in between arrives
    /// as [`ClientEvent::Unsolicited`] events, answered with
    /// [`ZipClient::grant_s2_keys`] and [`ZipClient::set_s2_dsk`].
    pub async fn include_node(&self) -> CommandResult {
        self.execute(ZWaveCommand::NodeAdd(NodeAdd {
            seq_no: 0,
            mode: NodeAddMode::AnyS2,
            tx_options: 0x20,
        }))
        .await
    }

    /// Abort a running inclusion.
    pub async fn include_node_stop(&self) -> CommandResult {
        self.execute(ZWaveCommand::NodeAdd(NodeAdd {
            seq_no: 0,
            mode: NodeAddMode::Stop,
            tx_options: 0,
        }))
        .await
    }

    /// Start an exclusion. Resolves with the node-remove status report.
    pub async fn exclude_node(&self) -> CommandResult {
        self.execute(ZWaveCommand::NodeRemove(NodeRemove {
            seq_no: 0,
            mode: NodeRemoveMode::Any,
        }))
        .await
    }

    /// Abort a running exclusion.
    pub async fn exclude_node_stop(&self) -> CommandResult {
        self.execute(ZWaveCommand::NodeRemove(NodeRemove {
            seq_no: 0,
            mode: NodeRemoveMode::Stop,
        }))
        .await
    }

    /// Answer a key request observed during inclusion.
    pub async fn grant_s2_keys(&self, keys: S2KeyMask, grant_csa: bool) -> CommandResult {
        self.execute(ZWaveCommand::NodeAddKeysSet(NodeAddKeysSet {
            seq_no: 0,
            accept: true,
            grant_csa,
            granted_keys: keys,
        }))
        .await
    }

    /// Provide the user-entered DSK digits observed during inclusion.
    pub async fn set_s2_dsk(&self, input: Vec<u8>) -> CommandResult {
        self.execute(ZWaveCommand::NodeAddDskSet(NodeAddDskSet {
            seq_no: 0,
            accept: true,
            input,
        }))
        .await
    }

    /// Signal that interviewing of a freshly included node is complete,
    /// returning the network to idle.
    pub async fn configuration_done(&self) -> Result<(), CommandError> {
        self.requests
            .send(Request::ConfigurationDone)
            .await
            .map_err(|_| CommandError::TransportClosed)
    }

    /// Put the gateway's controller into learn mode.
    pub async fn learn_mode(&self) -> CommandResult {
        self.execute(ZWaveCommand::LearnModeSet(LearnModeSet {
            seq_no: 0,
            mode: LearnMode::Routed,
        }))
        .await
    }

    /// Factory-reset the gateway's controller.
    pub async fn factory_default(&self) -> CommandResult {
        self.execute(ZWaveCommand::DefaultSet(DefaultSet { seq_no: 0 })).await
    }

    /// Fetch the network's node list.
    pub async fn get_node_list(&self) -> Result<Vec<NodeId>, CommandError> {
        match self.execute(ZWaveCommand::NodeListGet(NodeListGet { seq_no: 0 })).await? {
            CommandOutcome::Report(ZWaveCommand::NodeListReport(report)) => Ok(report.node_list),
            _ => Err(CommandError::UnexpectedResponse),
        }
    }

    /// Fetch the cached node information for one node.
    pub async fn get_node_info(
        &self,
        node_id: NodeId,
    ) -> Result<NodeInfoCacheReport, CommandError> {
        let request =
            ZWaveCommand::NodeInfoCachedGet(NodeInfoCachedGet { seq_no: 0, max_age: 0, node_id });
        match self.execute(request).await? {
            CommandOutcome::Report(ZWaveCommand::NodeInfoCacheReport(report)) => Ok(report),
            _ => Err(CommandError::UnexpectedResponse),
        }
    }

    /// Send an arbitrary command-class frame to a node.
    ///
    /// The gateway owns mesh routing; the node id is validated here and
    /// the frame travels over the gateway connection.
    pub async fn send_command(
        &self,
        node_id: NodeId,
        command_class: u8,
        command: u8,
        params: Vec<u8>,
    ) -> CommandResult {
        tracing::trace!(node = %node_id, command_class, command, "sending raw command");
        let command_class = CommandClass::from_byte(command_class);
        self.execute(ZWaveCommand::Raw(RawCommand {
            command_class,
            command: CommandId::from_bytes(command_class, command),
            value: params.into(),
        }))
        .await
    }

    /// Shut down: cancel in-flight commands and stop the driver.
    ///
    /// Dropping the client without calling this also stops the driver -
    /// it notices the closed request channel - but `close` waits for the
    /// cancellations to be delivered.
    pub async fn close(self) {
        let _ = self.requests.send(Request::Shutdown).await;
        let _ = self.driver.await;
    }
}

async fn drive<T, E>(
    mut coordinator: NetworkCoordinator,
    transport: T,
    env: E,
    mut requests: mpsc::Receiver<Request>,
    events: broadcast::Sender<ClientEvent>,
) where
    T: Transport,
    E: Environment,
{
    let mut pending: HashMap<u8, oneshot::Sender<CommandResult>> = HashMap::new();

    loop {
        tokio::select! {
            inbound = transport.recv() => match inbound {
                Ok(datagram) => {
                    let actions = inbound_actions(&mut coordinator, &env, &datagram, &transport).await;
                    if !execute(&mut coordinator, &transport, &mut pending, &events, actions).await {
                        break;
                    }
                }
                Err(error) => {
                    tracing::error!(%error, "transport receive failed");
                    let actions = coordinator.transport_failed();
                    deliver_only(&mut pending, &events, actions);
                    break;
                }
            },

            request = requests.recv() => match request {
                Some(Request::Execute { request, reply }) => {
                    match coordinator.dispatch(request, env.now()) {
                        Ok((seq_no, actions)) => {
                            pending.insert(seq_no, reply);
                            if !execute(&mut coordinator, &transport, &mut pending, &events, actions).await {
                                break;
                            }
                        }
                        Err(error) => {
                            let _ = reply.send(Err(error));
                        }
                    }
                }
                Some(Request::Mode { reply }) => {
                    let _ = reply.send(coordinator.mode());
                }
                Some(Request::ConfigurationDone) => coordinator.configuration_done(),
                Some(Request::Shutdown) | None => {
                    let actions = coordinator.shutdown();
                    deliver_only(&mut pending, &events, actions);
                    break;
                }
            },

            () = env.sleep(TICK_INTERVAL) => {
                let actions = coordinator.tick(env.now());
                if !execute(&mut coordinator, &transport, &mut pending, &events, actions).await {
                    break;
                }
            }
        }
    }
}

/// Decode one datagram and feed it to the coordinator. Ack requests are
/// answered before routing so gateway retransmission stops even when the
/// body only concerns a subscriber.
async fn inbound_actions<E: Environment>(
    coordinator: &mut NetworkCoordinator,
    env: &E,
    datagram: &[u8],
    transport: &impl Transport,
) -> Vec<CoordinatorAction> {
    match Datagram::decode(datagram) {
        Ok(Datagram::Command(packet)) => {
            if packet.types.contains(PacketTypes::ACK_REQUEST) {
                let ack = Packet::ack_response(packet.seq_number).to_bytes();
                if let Err(error) = transport.send(&ack).await {
                    tracing::error!(%error, "failed to acknowledge inbound frame");
                }
            }
            coordinator.handle_packet(packet, env.now())
        }
        Ok(Datagram::KeepAlive(keep_alive)) => {
            if keep_alive.types.contains(PacketTypes::ACK_REQUEST) {
                if let Err(error) = transport.send(&KeepAlive::response().to_bytes()).await {
                    tracing::error!(%error, "failed to answer keep-alive");
                }
            }
            Vec::new()
        }
        Err(error) => {
            // Malformed traffic is logged and dropped; a command the frame
            // may have been meant for simply keeps waiting.
            tracing::debug!(%error, len = datagram.len(), "dropping undecodable datagram");
            Vec::new()
        }
    }
}

/// Execute coordinator actions. Returns false when the transport died and
/// the driver should stop.
async fn execute<T: Transport>(
    coordinator: &mut NetworkCoordinator,
    transport: &T,
    pending: &mut HashMap<u8, oneshot::Sender<CommandResult>>,
    events: &broadcast::Sender<ClientEvent>,
    actions: Vec<CoordinatorAction>,
) -> bool {
    for action in actions {
        match action {
            CoordinatorAction::SendFrame(frame) => {
                if let Err(error) = transport.send(&frame).await {
                    tracing::error!(%error, "transport send failed");
                    let failures = coordinator.transport_failed();
                    deliver_only(pending, events, failures);
                    return false;
                }
            }
            CoordinatorAction::CommandQueued { seq_no } => {
                if let Some(reply) = pending.remove(&seq_no) {
                    let _ = reply.send(Ok(CommandOutcome::Queued { seq_no }));
                }
            }
            CoordinatorAction::CommandComplete { seq_no, result } => {
                deliver(pending, events, seq_no, result);
            }
            CoordinatorAction::Unsolicited(packet) => {
                let _ = events.send(ClientEvent::Unsolicited(packet));
            }
        }
    }
    true
}

/// Deliver completions without touching the transport (shutdown paths).
fn deliver_only(
    pending: &mut HashMap<u8, oneshot::Sender<CommandResult>>,
    events: &broadcast::Sender<ClientEvent>,
    actions: Vec<CoordinatorAction>,
) {
    for action in actions {
        if let CoordinatorAction::CommandComplete { seq_no, result } = action {
            deliver(pending, events, seq_no, result);
        }
    }
}

fn deliver(
    pending: &mut HashMap<u8, oneshot::Sender<CommandResult>>,
    events: &broadcast::Sender<ClientEvent>,
    seq_no: u8,
    result: CommandResult,
) {
    match pending.remove(&seq_no) {
        Some(reply) => {
            let _ = reply.send(result);
        }
        // The caller already got `Queued`; publish the late result.
        None => {
            let _ = events.send(ClientEvent::QueuedCommandResult { seq_no, result });
        }
    }
}
