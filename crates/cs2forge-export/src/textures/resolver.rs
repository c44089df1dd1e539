//! Texture resolution over a shading graph

use cs2forge_scene::{sockets, NodeKind, ShadingGraph};
use tracing::trace;

use super::{Channel, TextureSet};

/// Find the image feeding each channel of the material's principled shader
///
/// `None` (a material without a node graph), a graph without a principled
/// node, and unlinked or non-image inputs all resolve to empty channels.
pub fn resolve<G: ShadingGraph + ?Sized>(graph: Option<&G>) -> TextureSet<String> {
    let mut set = TextureSet::empty();
    let Some(graph) = graph else {
        return set;
    };
    for channel in Channel::ALL {
        set.set(channel, resolve_channel(graph, channel));
    }
    set
}

/// Image name bound upstream of one channel
pub fn resolve_channel<G: ShadingGraph + ?Sized>(graph: &G, channel: Channel) -> Option<String> {
    let shader = graph.principled_node()?;
    let upstream = graph.linked_upstream(shader, channel.socket())?;

    let source = match upstream.kind {
        NodeKind::NormalMap if channel.follows_adapter() => {
            graph.linked_upstream(upstream, sockets::COLOR)?
        }
        _ => upstream,
    };

    let image = source.bound_image();
    trace!(%channel, node = %source.name, image = ?image, "Resolved channel");
    image.map(str::to_string)
}
