use std::{
    io, mem,
    os::fd::{AsRawFd, OwnedFd},
};

use libc::{packet_mreq, sockaddr_ll, ETH_ALEN, ETH_P_ALL, PACKET_MR_PROMISC, SOL_PACKET, SO_PRIORITY};
use nix::sys::socket::{socket, AddressFamily, SockFlag, SockProtocol, SockType};

// PACKET_IGNORE_OUTGOING (Linux 4.20+); not in libc yet.
const PACKET_IGNORE_OUTGOING: libc::c_int = 23;

/// Open the raw AF_PACKET socket the injector transmits on. Blocking: the
/// pipeline is strictly sequential and a send either completes or fails.
pub fn open_socket_tx(ifindex: i32) -> Result<OwnedFd, String> {
    let mut saddr: sockaddr_ll = unsafe { mem::zeroed() };
    let mut mrq: packet_mreq = unsafe { mem::zeroed() };
    let prioval = 20;

    let fd_socket_tx = socket(
        AddressFamily::Packet,
        SockType::Raw,
        SockFlag::SOCK_CLOEXEC,
        SockProtocol::EthAll,
    )
    .map_err(|e| e.to_string())?;

    mrq.mr_ifindex = ifindex;
    mrq.mr_type = PACKET_MR_PROMISC as u16;

    let ret = unsafe {
        libc::setsockopt(
            fd_socket_tx.as_raw_fd(),
            SOL_PACKET,
            libc::PACKET_ADD_MEMBERSHIP,
            &mrq as *const _ as *const libc::c_void,
            mem::size_of::<packet_mreq>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err("Failed to set PACKET_ADD_MEMBERSHIP option".to_string());
    }

    unsafe {
        libc::setsockopt(
            fd_socket_tx.as_raw_fd(),
            SOL_PACKET,
            SO_PRIORITY,
            &prioval as *const _ as *const libc::c_void,
            mem::size_of::<i32>() as libc::socklen_t,
        )
    };

    saddr.sll_family = libc::AF_PACKET as u16;
    saddr.sll_protocol = (ETH_P_ALL as u16).to_be();
    saddr.sll_ifindex = ifindex;
    saddr.sll_halen = ETH_ALEN as u8;

    let bind_ret = unsafe {
        libc::bind(
            fd_socket_tx.as_raw_fd(),
            (&saddr as *const libc::sockaddr_ll).cast(),
            mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
        )
    };
    if bind_ret < 0 {
        let error = io::Error::last_os_error();
        return Err(format!("Bind failed: {}", error));
    }

    Ok(fd_socket_tx)
}

/// Open the raw AF_PACKET socket the capture loop reads from, with
/// promiscuous membership on the interface. Our own transmissions are
/// filtered out where the kernel supports it.
pub fn open_socket_rx(ifindex: i32) -> Result<OwnedFd, String> {
    let mut saddr: sockaddr_ll = unsafe { mem::zeroed() };
    let mut mrq: packet_mreq = unsafe { mem::zeroed() };
    let prioval = 20;

    let fd_socket_rx = socket(
        AddressFamily::Packet,
        SockType::Raw,
        SockFlag::SOCK_CLOEXEC,
        SockProtocol::EthAll,
    )
    .map_err(|e| e.to_string())?;

    mrq.mr_ifindex = ifindex;
    mrq.mr_type = PACKET_MR_PROMISC as u16;

    let ret = unsafe {
        libc::setsockopt(
            fd_socket_rx.as_raw_fd(),
            SOL_PACKET,
            libc::PACKET_ADD_MEMBERSHIP,
            &mrq as *const _ as *const libc::c_void,
            mem::size_of::<packet_mreq>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err("Failed to set PACKET_ADD_MEMBERSHIP option".to_string());
    }

    unsafe {
        libc::setsockopt(
            fd_socket_rx.as_raw_fd(),
            SOL_PACKET,
            SO_PRIORITY,
            &prioval as *const _ as *const libc::c_void,
            mem::size_of::<i32>() as libc::socklen_t,
        )
    };

    // Best effort; older kernels simply keep echoing our own frames back.
    let enable: libc::c_int = 1;
    let ret = unsafe {
        libc::setsockopt(
            fd_socket_rx.as_raw_fd(),
            SOL_PACKET,
            PACKET_IGNORE_OUTGOING,
            &enable as *const _ as *const libc::c_void,
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        eprintln!("PACKET_IGNORE_OUTGOING is not supported by kernel...");
    }

    saddr.sll_family = libc::AF_PACKET as u16;
    saddr.sll_protocol = (ETH_P_ALL as u16).to_be();
    saddr.sll_ifindex = ifindex;
    saddr.sll_halen = ETH_ALEN as u8;
    saddr.sll_pkttype = 3;

    let bind_ret = unsafe {
        libc::bind(
            fd_socket_rx.as_raw_fd(),
            (&saddr as *const libc::sockaddr_ll).cast(),
            mem::size_of::<sockaddr_ll>() as libc::socklen_t,
        )
    };
    if bind_ret < 0 {
        let error = io::Error::last_os_error();
        return Err(format!("Bind failed: {}", error));
    }

    Ok(fd_socket_rx)
}
