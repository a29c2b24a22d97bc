/// WGSL shader for scene meshes: per-object transforms plus one directional light.
pub const MESH_SHADER: &str = r#"
struct ObjectConstants {
    world_view_proj: mat4x4<f32>,
    world: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    light_dir: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> object: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = object.world_view_proj * vec4<f32>(vertex.position, 1.0);
    out.world_normal = (object.normal_matrix * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var lighting = 1.0;
    let n_len = length(in.world_normal);
    let l_len = length(object.light_dir.xyz);
    if (n_len > 0.0001 && l_len > 0.0001) {
        let diffuse = max(dot(in.world_normal / n_len, object.light_dir.xyz / l_len), 0.0);
        lighting = 0.3 + diffuse * 0.7;
    }
    return vec4<f32>(in.color * lighting, 1.0);
}
"#;

/// WGSL shader for the fullscreen starfield. Positions are already in clip space.
pub const BACKDROP_SHADER: &str = r#"
struct BackdropVertex {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct BackdropOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_backdrop(vertex: BackdropVertex) -> BackdropOutput {
    var out: BackdropOutput;
    out.clip_position = vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}

fn star_hash(cell: vec2<f32>) -> f32 {
    return fract(cos(dot(cell, vec2<f32>(12.345, 67.890))) * 123.456);
}

@fragment
fn fs_backdrop(in: BackdropOutput) -> @location(0) vec4<f32> {
    let cell = floor(in.uv * 40.0);
    let corner = cell / 40.0;
    let brightness = star_hash(cell);
    let dist = max(length(in.uv - corner), 0.0001);
    let star = brightness * 0.02 / dist;
    let color = star * vec3<f32>(0.8, 0.9, 1.0);
    return vec4<f32>(clamp(color, vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
}
"#;
